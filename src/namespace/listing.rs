use std::fmt;

use colored::Colorize;

use super::{KindTag, Node};

/// Text used when rendering a [`Listing`]. The wording may change, the
/// layout does not: file lines, directory lines, two totals, or a single
/// empty marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLabels {
    pub file: String,
    pub directory: String,
    pub files_total: String,
    pub directories_total: String,
    pub empty: String,
}

impl Default for ListingLabels {
    fn default() -> Self {
        Self {
            file: "[File]".into(),
            directory: "[Directory]".into(),
            files_total: "Total files".into(),
            directories_total: "Total directories".into(),
            empty: "Directory is empty".into(),
        }
    }
}

/// Names of a directory's children split by kind. Each group keeps the
/// order in which the children were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    files: Vec<String>,
    directories: Vec<String>,
}

impl Listing {
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut listing = Self::default();
        for node in nodes {
            listing.push(node);
        }
        listing
    }

    pub fn push(&mut self, node: &Node) {
        match node.kind().tag() {
            KindTag::File => self.files.push(node.name().to_string()),
            KindTag::Directory => self.directories.push(node.name().to_string()),
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    pub fn render(&self, labels: &ListingLabels, color: bool) -> String {
        if self.is_empty() {
            return format!("{}\n", labels.empty);
        }

        let (file_tag, directory_tag) = if color {
            (
                labels.file.green().to_string(),
                labels.directory.blue().bold().to_string(),
            )
        } else {
            (labels.file.clone(), labels.directory.clone())
        };

        let mut out = String::new();
        for name in &self.files {
            out.push_str(&format!("{file_tag} {name}\n"));
        }
        for name in &self.directories {
            out.push_str(&format!("{directory_tag} {name}\n"));
        }
        out.push_str(&format!("{}: {}\n", labels.files_total, self.files.len()));
        out.push_str(&format!(
            "{}: {}\n",
            labels.directories_total,
            self.directories.len()
        ));
        out
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ListingLabels::default(), false))
    }
}
