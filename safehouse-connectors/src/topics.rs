//! Topic table

use safehouse_core::gas::GasChannel;

/// Default topic prefix
pub const DEFAULT_PREFIX: &str = "warehouse";

/// Every topic the node publishes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub temperature: String,
    pub humidity: String,
    pub lpg: String,
    pub co: String,
    pub smoke: String,
    pub motion: String,
    pub inside_count: String,
    pub rfid: String,
    pub alert: String,
    pub status: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Topics {
    /// Build the table under `prefix`; trailing slashes are ignored
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        let topic = |leaf: &str| {
            if prefix.is_empty() {
                leaf.to_string()
            } else {
                format!("{}/{}", prefix, leaf)
            }
        };

        Self {
            temperature: topic("temperature"),
            humidity: topic("humidity"),
            lpg: topic("gas/lpg"),
            co: topic("gas/co"),
            smoke: topic("gas/smoke"),
            motion: topic("motion"),
            inside_count: topic("inside_count"),
            rfid: topic("rfid"),
            alert: topic("alert"),
            status: topic("status"),
        }
    }

    /// Topic for one gas channel
    pub fn gas(&self, channel: GasChannel) -> &str {
        match channel {
            GasChannel::Lpg => &self.lpg,
            GasChannel::Co => &self.co,
            GasChannel::Smoke => &self.smoke,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let topics = Topics::default();
        assert_eq!(topics.temperature, "warehouse/temperature");
        assert_eq!(topics.gas(GasChannel::Smoke), "warehouse/gas/smoke");
        assert_eq!(topics.inside_count, "warehouse/inside_count");
    }

    #[test]
    fn prefix_normalization() {
        assert_eq!(Topics::new("esp32/warehouse/").alert, "esp32/warehouse/alert");
        assert_eq!(Topics::new("").status, "status");
    }
}
