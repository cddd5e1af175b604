// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and
//! passed explicitly into component constructors; nothing reads ambient
//! globals after boot.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory for the redb store file | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret | Required |
//! | `TOKEN_TTL_HOURS` | Session token lifetime | `24` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Application configuration assembled at process startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Fails when `JWT_SECRET` is missing; everything else has a default.
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;
        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| "TOKEN_TTL_HOURS must be a number".to_string())?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "/data".to_string())
                .into(),
            jwt_secret,
            token_ttl_hours,
            log_json: env::var("LOG_FORMAT").as_deref() == Ok("json"),
        })
    }

    /// Path of the redb store file under the data directory.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("campus.redb")
    }
}
