use std::env;
use std::path::Path;

use log::{error, info};
use rs_phrase_core::{Config, Error, FolderStorage, Session};

const CONFIG_PATH: &str = "./config.toml";
const DEFAULT_DICTIONARY: &str = "demo";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Missing or invalid keys fall back to defaults (30 words, 10 before ending the sentence)
    let config = Config::load(CONFIG_PATH);
    let storage = FolderStorage::new(&config.data_folder);
    let mut session = Session::start(storage, config)?;

    // Reopen the last dictionary, or any existing one, or create a new one
    if session.current_name().is_none() {
        match session.available()?.first() {
            Some(name) => session.open(name)?,
            None => session.create(DEFAULT_DICTIONARY)?,
        }
    }
    info!("Available dictionaries: {}", session.available()?.join(", "));

    // Learn from a corpus placed next to the dictionaries, if any
    let corpus = Path::new(&session.config().data_folder).join("corpus.txt");
    if corpus.is_file() {
        match session.ingest_file(&corpus) {
            Ok(touched) => info!("Learned {touched} contexts from {}", corpus.display()),
            Err(Error::InvalidInput(e)) => error!("Wrong file type: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    // Every argument is a phrase to continue
    let phrases: Vec<String> = env::args().skip(1).collect();
    if phrases.is_empty() {
        println!("Usage: rs-phrase-exemple \"beginning of a phrase\" ...");
    }
    for phrase in &phrases {
        match session.generate(phrase) {
            Ok(generated) => println!("{generated}"),
            Err(Error::InvalidInput(_)) => {
                println!("The input must contain at least one Latin or Cyrillic letter")
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Remember the open dictionary for the next run
    session.config().save(CONFIG_PATH)?;
    Ok(())
}
