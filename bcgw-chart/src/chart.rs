use crate::error::Result;
use log::info;
use std::path::Path;

/// A rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub subtitle: Option<String>,
    /// Complete SVG document.
    pub svg: String,
}

impl Chart {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), &self.svg)?;
        info!("Wrote chart '{}' to {}", self.title, path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Chart;

    #[test]
    fn test_save_writes_svg() {
        let chart = Chart {
            title: String::from("t"),
            subtitle: None,
            svg: String::from("<svg></svg>"),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        chart.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg></svg>");
        assert!(chart.save(dir.path().join("missing/chart.svg")).is_err());
    }
}
