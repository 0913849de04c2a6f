#![allow(dead_code)]

use newton_project::config::{
    AccountsConfig, ConcurrencyConfig, ExecutionConfig, LoggingConfig, NewtonConfig, PortalConfig,
    ProxySettings, RollInterval,
};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Config pointing at `base_url` with zero roll pauses and sequential dispatch.
pub fn test_config(base_url: &str, accounts_file: &Path) -> NewtonConfig {
    NewtonConfig {
        logging: LoggingConfig {
            level: "DEBUG".to_string(),
            file: "newton-test.log".to_string(),
        },
        accounts: AccountsConfig {
            accounts_file: accounts_file.to_string_lossy().into_owned(),
        },
        proxy: ProxySettings {
            enabled: false,
            proxy_file: "proxies.txt".to_string(),
        },
        concurrent: ConcurrencyConfig {
            enabled: false,
            max_workers: 5,
        },
        execution: ExecutionConfig {
            interval_hours: 24,
            roll_interval: RollInterval {
                min_seconds: 0.0,
                max_seconds: 0.0,
            },
            request_timeout_seconds: 5,
        },
        portal: PortalConfig {
            base_url: base_url.to_string(),
        },
    }
}

pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

/// In-memory log sink for a scoped tracing subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().lines().filter(|l| l.contains(needle)).count()
    }

    /// Installs a subscriber writing into this sink for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
