use anyhow::Context as _;
use std::io::Read as _;
use wiki_inputbox::{
    ForeignTitleFactory as _, NaiveForeignTitleFactory, SiteConfig, SiteHost, render_tag,
};

fn usage<T>(err: &'static str) -> anyhow::Result<T> {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] render [<inputbox.txt>]");
    println!("       {exe} [options] title <title> [--ns <id>]\n");
    println!("`render` reads the tag body from standard input if no file is given.\n");
    println!("or, use environment variables:");
    println!("    WIKI_SITEINFO\n");
    println!("Options:");
    println!("    --site: Site configuration from fetch-config (default: English Wikipedia)");
    println!("    --script: Main script path (default: /w/index.php)");
    println!("    --article-path: Article path (default: /wiki/$1)");
    println!("    --visual-editor: Treat VisualEditor as installed\n");
    Err(anyhow::Error::msg(err))
}

fn load_site(args: &mut pico_args::Arguments) -> anyhow::Result<SiteConfig> {
    let path = if let Some(path) = args.opt_value_from_str::<_, String>("--site")? {
        Some(path)
    } else {
        std::env::var("WIKI_SITEINFO").ok()
    };

    let mut site = if let Some(path) = path {
        SiteConfig::from_file(&path).with_context(|| format!("loading {path}"))?
    } else {
        SiteConfig::default()
    };

    if let Some(script) = args.opt_value_from_str::<_, String>("--script")? {
        site.script = script;
    }
    if let Some(article_path) = args.opt_value_from_str::<_, String>("--article-path")? {
        site.article_path = article_path;
    }

    Ok(site)
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = pico_args::Arguments::from_env();
    let site = load_site(&mut args)?;
    let visual_editor = args.contains("--visual-editor");
    let ns = args.opt_value_from_str::<_, i32>("--ns")?;
    let _ = args.contains("--");

    let Some(command) = args.opt_free_from_str::<String>()? else {
        return usage("Missing command");
    };

    match command.as_str() {
        "render" => {
            let body = if let Some(path) = args.opt_free_from_str::<String>()? {
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
            } else {
                let mut body = String::new();
                std::io::stdin().read_to_string(&mut body)?;
                body
            };

            if !args.finish().is_empty() {
                return usage("Unknown extra arguments passed");
            }

            let mut host = SiteHost::new(site);
            if visual_editor {
                host = host.with_extension("VisualEditor");
            }

            let rendered = render_tag(&body, &host);
            log::debug!("required styles: {}", rendered.module_styles.join(", "));
            println!("{}", rendered.html);
        }
        "title" => {
            let Some(title) = args.opt_free_from_str::<String>()? else {
                return usage("Missing title argument");
            };

            if !args.finish().is_empty() {
                return usage("Unknown extra arguments passed");
            }

            let title = NaiveForeignTitleFactory::new(&site).create_foreign_title(&title, ns);
            println!("{title}");
        }
        _ => return usage("Unknown command"),
    }

    Ok(())
}
