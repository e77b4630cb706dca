use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use vitrina::content::{fetch_page, PageKind, SanityClient};
use vitrina::i18n::Locale;
use vitrina::options::Options;

const USAGE: &str =
    "Usage: vitrina <home|about|services|contact|projects> [ca|es|en] [options.toml]";

fn run(page: &str, locale: Option<&str>, options_path: Option<&str>) -> Result<(), String> {
    let kind = PageKind::from_name(page).ok_or_else(|| format!("unknown page '{page}'"))?;
    let locale = locale.map_or(Locale::DEFAULT, Locale::from_code_or_default);
    let options = match options_path {
        Some(path) => Options::load(Path::new(path)).map_err(|e| e.to_string())?,
        None => Options::default(),
    }
    .with_env();

    let client = SanityClient::new(&options.cms).map_err(|e| e.to_string())?;
    log::info!("fetching {kind:?} ({locale}) from {}", client.endpoint());
    let Some(doc) = fetch_page(&client, kind, locale) else {
        return Err(format!("no {kind:?} document for '{locale}' or the default locale"));
    };
    if !doc.is_validated() {
        log::warn!("document did not match the page model; printing it raw");
    }
    let json = doc.to_json().map_err(|e| e.to_string())?;
    let pretty = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;
    writeln!(std::io::stdout().lock(), "{pretty}").map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(page) = args.first() else {
        log::error!("{USAGE}");
        return ExitCode::FAILURE;
    };
    match run(page, args.get(1).map(String::as_str), args.get(2).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
