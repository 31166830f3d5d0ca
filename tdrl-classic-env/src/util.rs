use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

pub(crate) fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>, name: &str) -> Result<T> {
    let path_ = path.as_ref().to_owned();
    let file = File::open(path)?;
    let rdr = BufReader::new(file);
    let b = serde_yaml::from_reader(rdr)?;
    info!("Load config of {} from {}", name, path_.to_str().unwrap_or("?"));
    Ok(b)
}

pub(crate) fn save_config<T: Serialize>(config: &T, path: impl AsRef<Path>, name: &str) -> Result<()> {
    let path_ = path.as_ref().to_owned();
    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(config)?.as_bytes())?;
    info!("Save config of {} into {}", name, path_.to_str().unwrap_or("?"));
    Ok(())
}
