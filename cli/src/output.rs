//! Report types and output writing for CLI tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON document (default).
    #[default]
    Json,
    /// Plain-text listing.
    Txt,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
        }
    }

    /// Infer the format from a path extension, if recognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(OutputFormat::Json),
            "txt" => Some(OutputFormat::Txt),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "txt" => Ok(OutputFormat::Txt),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// Append the format's extension when the output path has none.
pub fn resolve_output_path(path: PathBuf, format: OutputFormat) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(format.as_str())
    } else {
        path
    }
}

/// Clustering result report.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub num_clusters: usize,

    /// Items excluded because their embedding failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,

    pub clusters: BTreeMap<u32, Vec<String>>,
}

impl ClusterReport {
    pub fn new(clusters: BTreeMap<u32, Vec<String>>, failed: Vec<String>) -> Self {
        Self {
            num_clusters: clusters.len(),
            failed,
            clusters,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Clustering result: {} clusters\n", self.num_clusters));
        out.push_str(&format!("{}\n", "=".repeat(60)));
        for (id, members) in &self.clusters {
            out.push_str(&format!("\nCluster {}: {} images\n", id, members.len()));
            out.push_str(&format!("{}\n", "-".repeat(60)));
            for member in members {
                out.push_str(&format!("  - {member}\n"));
            }
        }
        if !self.failed.is_empty() {
            out.push_str(&format!("\nFailed to embed: {} images\n", self.failed.len()));
            for member in &self.failed {
                out.push_str(&format!("  - {member}\n"));
            }
        }
        out
    }

    pub fn print(&self) {
        print!("{}", self.render_text());
    }

    pub fn save(&self, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
        write_report(self, &self.render_text(), path, format)
    }
}

/// Classification result report.
#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub total_categories: usize,
    pub total_images: usize,
    pub classifications: BTreeMap<String, Vec<String>>,
}

impl ClassifyReport {
    pub fn new(classifications: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            total_categories: classifications.len(),
            total_images: classifications.values().map(Vec::len).sum(),
            classifications,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Classification result: {} categories, {} images\n",
            self.total_categories, self.total_images
        ));
        out.push_str(&format!("{}\n", "=".repeat(60)));
        for (label, members) in &self.classifications {
            out.push_str(&format!("\nCategory {}: {} images\n", label, members.len()));
            out.push_str(&format!("{}\n", "-".repeat(60)));
            for member in members {
                out.push_str(&format!("  - {member}\n"));
            }
        }
        out
    }

    pub fn print(&self) {
        print!("{}", self.render_text());
    }

    pub fn save(&self, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
        write_report(self, &self.render_text(), path, format)
    }
}

fn write_report<T: Serialize>(
    report: &T,
    text: &str,
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Txt => text.to_string(),
    };
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Txt);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.json")),
            Some(OutputFormat::Json)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out.txt")),
            Some(OutputFormat::Txt)
        );
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), None);
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path(PathBuf::from("result"), OutputFormat::Txt),
            PathBuf::from("result.txt")
        );
        assert_eq!(
            resolve_output_path(PathBuf::from("result.json"), OutputFormat::Txt),
            PathBuf::from("result.json")
        );
    }

    #[test]
    fn test_cluster_report() {
        let mut clusters = BTreeMap::new();
        clusters.insert(0u32, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        clusters.insert(1u32, vec!["c.jpg".to_string()]);
        let report = ClusterReport::new(clusters, vec!["broken.jpg".to_string()]);

        assert_eq!(report.num_clusters, 2);
        let text = report.render_text();
        assert!(text.contains("Cluster 0: 2 images"));
        assert!(text.contains("Failed to embed: 1 images"));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"num_clusters\":2"));
        assert!(json.contains("\"0\":[\"a.jpg\",\"b.jpg\"]"));
    }

    #[test]
    fn test_classify_report_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut classifications = BTreeMap::new();
        classifications.insert("home".to_string(), vec!["a.jpg".to_string()]);
        let report = ClassifyReport::new(classifications);
        assert_eq!(report.total_images, 1);

        let json_path = dir.path().join("out.json");
        report.save(&json_path, OutputFormat::Json).unwrap();
        let loaded: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(loaded["total_categories"], 1);

        let txt_path = dir.path().join("out.txt");
        report.save(&txt_path, OutputFormat::Txt).unwrap();
        assert!(fs::read_to_string(&txt_path)
            .unwrap()
            .contains("Category home: 1 images"));
    }
}
