//! Markdown report and GitHub Actions step outputs

use crate::domain::TagsResult;
use crate::error::{ImageTaggerError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Render the Docker Hub links for a resolved build as markdown.
pub fn render_markdown(tags: &TagsResult) -> String {
    let mut markdown = String::from("### Image Repo:\n\n");
    markdown.push_str(&format!(
        "[{}](https://hub.docker.com/repository/docker/{}/tags/)\n\n",
        tags.all_images(),
        tags.repo
    ));
    markdown.push_str("### Main Tag:\n\n");
    markdown.push_str(&format!(
        "[{}:{}](https://hub.docker.com/r/{}/tags?name={})\n\n",
        tags.repo, tags.tag, tags.repo, tags.tag
    ));
    markdown
}

/// Step outputs published for later workflow steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    pub all_images: String,
    pub report: String,
    pub new_tag: String,
    pub new_image: String,
}

impl ActionOutputs {
    pub fn new(tags: &TagsResult, report: String) -> Self {
        ActionOutputs {
            all_images: tags.all_images(),
            report,
            new_tag: tags.tag.clone(),
            new_image: tags.repo.clone(),
        }
    }

    /// Output names and values, in publishing order
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("all-images", self.all_images.as_str()),
            ("report", self.report.as_str()),
            ("new-tag", self.new_tag.as_str()),
            ("new-image", self.new_image.as_str()),
        ]
    }

    /// Serialize as `GITHUB_OUTPUT` file entries
    ///
    /// Every value uses the `name<<DELIMITER` form so multi-line values like
    /// the report survive intact.
    pub fn to_output_file_format(&self, delimiter: &str) -> Result<String> {
        let mut buf = String::new();
        for (name, value) in self.pairs() {
            if value.contains(delimiter) {
                return Err(ImageTaggerError::config(format!(
                    "output '{}' contains the delimiter '{}'",
                    name, delimiter
                )));
            }
            buf.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter));
        }
        Ok(buf)
    }

    /// Append all outputs to the `GITHUB_OUTPUT` file at `path`
    pub fn append_to(&self, path: &Path, delimiter: &str) -> Result<()> {
        let entries = self.to_output_file_format(delimiter)?;
        append(path, &entries)
    }
}

/// Append the report to the job summary file (`GITHUB_STEP_SUMMARY`)
pub fn append_step_summary(path: &Path, markdown: &str) -> Result<()> {
    append(path, markdown)
}

fn append(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageVersion, Version};
    use std::fs;
    use tempfile::TempDir;

    fn tags(repo: &str, tag: &str) -> TagsResult {
        TagsResult {
            repo: repo.to_string(),
            tag: tag.to_string(),
            images: vec![repo.to_string()],
            version: ImageVersion::Released(Version::new(1, 2, 3)),
        }
    }

    #[test]
    fn test_render_markdown() {
        let report = render_markdown(&tags("myrepo/image", "v1.2.3"));
        assert_eq!(
            report,
            "### Image Repo:\n\n\
             [myrepo/image](https://hub.docker.com/repository/docker/myrepo/image/tags/)\n\n\
             ### Main Tag:\n\n\
             [myrepo/image:v1.2.3](https://hub.docker.com/r/myrepo/image/tags?name=v1.2.3)\n\n"
        );
    }

    #[test]
    fn test_render_markdown_lists_all_images() {
        let mut result = tags("owner/repo", "1.2.4");
        result.images = vec!["owner/repo:1.2.4".to_string(), "owner/repo:latest".to_string()];
        let report = render_markdown(&result);
        assert!(report.contains("[owner/repo:1.2.4,owner/repo:latest]"));
        assert!(report.contains("https://hub.docker.com/r/owner/repo/tags?name=1.2.4"));
    }

    #[test]
    fn test_output_file_format() {
        let outputs = ActionOutputs::new(&tags("owner/repo", "1.2.4"), "line1\nline2".to_string());
        let formatted = outputs.to_output_file_format("EOF_1").unwrap();
        assert_eq!(
            formatted,
            "all-images<<EOF_1\nowner/repo\nEOF_1\n\
             report<<EOF_1\nline1\nline2\nEOF_1\n\
             new-tag<<EOF_1\n1.2.4\nEOF_1\n\
             new-image<<EOF_1\nowner/repo\nEOF_1\n"
        );
    }

    #[test]
    fn test_output_value_containing_delimiter() {
        let outputs = ActionOutputs::new(&tags("owner/repo", "1.2.4"), "EOF_1".to_string());
        assert!(outputs.to_output_file_format("EOF_1").is_err());
    }

    #[test]
    fn test_append_outputs_and_summary() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("output");
        let summary_path = dir.path().join("summary.md");
        fs::write(&output_path, "previous=1\n").unwrap();

        let result = tags("owner/repo", "1.2.4");
        let report = render_markdown(&result);
        ActionOutputs::new(&result, report.clone())
            .append_to(&output_path, "DELIM")
            .unwrap();
        append_step_summary(&summary_path, &report).unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        assert!(written.starts_with("previous=1\n"));
        assert!(written.contains("new-tag<<DELIM\n1.2.4\nDELIM\n"));
        assert_eq!(fs::read_to_string(&summary_path).unwrap(), report);
    }
}
