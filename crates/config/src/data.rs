//! Input data configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Where the input tables live
///
/// # Example
///
/// ```toml
/// [data]
/// dir = "data"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory containing `events.csv`, `users.csv`, `orders.csv`,
    /// `order_items.csv` and `products.csv`
    /// Default: "data"
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_dir() {
        let config: DataConfig = toml::from_str(r#"dir = "/srv/thelook""#).unwrap();
        assert_eq!(config.dir, PathBuf::from("/srv/thelook"));
    }
}
