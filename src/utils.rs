// Copyright © 2019 Felix Obenhuber
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use config::Config;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::{env, path::PathBuf, sync::RwLock};

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// Detect configuration directory
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("linedrain"))
}

/// Configuration file from `LINEDRAIN_CONFIG` or `config_dir/config.toml`
pub fn config_file() -> Option<PathBuf> {
    env::var_os("LINEDRAIN_CONFIG")
        .map(PathBuf::from)
        .or_else(|| config_dir().map(|d| d.join("config.toml")))
}

/// Read a value from the configuration
pub fn config_get<'a, T: Deserialize<'a>>(key: &'a str) -> Option<T> {
    CONFIG.read().ok().and_then(|c| c.get::<T>(key).ok())
}

/// Merge the configuration file and `LINEDRAIN_*` environment variables.
/// A missing file is not an error.
pub fn config_init() {
    let mut settings = match CONFIG.write() {
        Ok(settings) => settings,
        Err(_) => return,
    };
    if let Some(file) = config_file() {
        settings.merge(config::File::from(file).required(false)).ok();
    }
    settings
        .merge(config::Environment::with_prefix("LINEDRAIN"))
        .ok();
}
