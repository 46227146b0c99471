use wiki_inputbox::SiteConfig;

/// Uses the [`Display`](core::fmt::Display) formatter for an error even when
/// the [`Debug`](core::fmt::Debug) formatter is requested.
struct DisplayError(Box<dyn std::error::Error>);

impl core::fmt::Debug for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl<E: Into<Box<dyn std::error::Error>>> From<E> for DisplayError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

// 'languagevariants' will be relevant when variant conversion is implemented
const PROPS: &str = concat!("general", "|namespaces", "|namespacealiases");

fn main() -> Result<(), DisplayError> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = pico_args::Arguments::from_env();
    let output = args.opt_value_from_str::<_, String>(["-o", "--output"])?;
    let prefix = args.free_from_str::<String>().map_err(
        |_| "missing required url argument\n\nUsage: fetch-config [-o siteinfo.json] https://wiki.example.com",
    )?;
    let result = ureq::get(format!("{prefix}/w/api.php"))
        .query("action", "query")
        .query("meta", "siteinfo")
        .query("format", "json")
        .query("formatversion", "2")
        .query("errorformat", "plaintext")
        .query("siprop", PROPS)
        .header(
            "User-Agent",
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        )
        .call()?;

    let json = result.into_body().read_to_string()?;

    // Make sure the response is usable before handing it out
    let config = SiteConfig::from_siteinfo_json(&json)?;
    log::info!(
        "{prefix}: {} namespaces, script path {}, article path {}",
        config.namespaces.len(),
        config.script,
        config.article_path
    );

    if let Some(output) = output {
        std::fs::write(&output, &json)?;
        log::info!("wrote {output}");
    } else {
        println!("{json}");
    }

    Ok(())
}
