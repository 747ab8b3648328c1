use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    client::Client,
    runtime::Runtime,
    state::{FileState, default_state_path},
};

pub struct Config<R: Runtime> {
    pub client: Client<FileState<R>>,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, state_path: Option<PathBuf>) -> Result<Self> {
        let path = match state_path {
            Some(path) => path,
            None => default_state_path(&runtime)?,
        };
        debug!("Using state file {:?}", path);

        let client = Client::with_state(FileState::new(runtime, path))?;
        Ok(Self { client })
    }
}
