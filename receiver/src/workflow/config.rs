use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use sweepcore::ingest::source::DEFAULT_CHUNK_SIZE;
use sweepcore::AnalyzerConfig;

pub const DEFAULT_LISTEN: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BRIDGE_PORT: u16 = 9000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub listen: String,
    pub port: u16,
    pub chunk_size: usize,
    pub max_hold: bool,
    pub waterfall: bool,
    pub bridge_port: u16,
    pub analyzer: AnalyzerConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            port: DEFAULT_PORT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_hold: false,
            waterfall: false,
            bridge_port: DEFAULT_BRIDGE_PORT,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ReceiverConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading receiver config {}", path_ref.display()))?;
        let config: ReceiverConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing receiver config {}", path_ref.display()))?;
        config
            .analyzer
            .validate()
            .with_context(|| format!("validating receiver config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(listen: String, port: u16, analyzer: AnalyzerConfig) -> Self {
        Self {
            listen,
            port,
            analyzer,
            ..Default::default()
        }
    }

    pub fn to_analyzer_config(&self) -> AnalyzerConfig {
        self.analyzer.clone()
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .listen
            .parse()
            .with_context(|| format!("parsing listen address {}", self.listen))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn bridge_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.bridge_port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_analyzer_config() {
        let analyzer = AnalyzerConfig {
            bin_count: 512,
            ..Default::default()
        };
        let cfg = ReceiverConfig::from_args("127.0.0.1".into(), 6000, analyzer);
        assert_eq!(cfg.to_analyzer_config().bin_count, 512);
        assert_eq!(cfg.listen_addr().unwrap().port(), 6000);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"port: 5001\nmax_hold: true\nanalyzer:\n  start_freq: 2.4e9\n  end_freq: 2.5e9\n  bin_count: 200\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = ReceiverConfig::load(&path).unwrap();
        assert_eq!(cfg.port, 5001);
        assert!(cfg.max_hold);
        assert_eq!(cfg.analyzer.bin_count, 200);
        assert_eq!(cfg.analyzer.waterfall_depth, 100);
        assert_eq!(cfg.listen, DEFAULT_LISTEN);
    }

    #[test]
    fn config_load_rejects_inverted_range() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"analyzer:\n  start_freq: 5.0e9\n  end_freq: 1.0e9\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(ReceiverConfig::load(&path).is_err());
    }

    #[test]
    fn bad_listen_address_is_reported() {
        let cfg = ReceiverConfig {
            listen: "not-an-ip".into(),
            ..Default::default()
        };
        assert!(cfg.listen_addr().is_err());
    }
}
