//! pm-project: project file format, validation, and compilation.
//!
//! A project file describes a binary system, the conditions to map it
//! over, and the tuning knobs of the mapper. Files are YAML or JSON;
//! every load and save passes through [`validate_project`].

pub mod compile;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use compile::{CompiledProject, compile};
pub use schema::*;
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Project is invalid: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model rejected the project: {0}")]
    Model(#[from] pm_model::ModelError),

    #[error("Mapping setup failed: {0}")]
    Map(#[from] pm_map::MapError),

    #[error("Cannot access project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Decode and validate a project.
    pub fn parse(self, text: &str) -> ProjectResult<Project> {
        let project: Project = match self {
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        };
        validate_project(&project)?;
        Ok(project)
    }

    /// Validate and encode a project.
    pub fn render(self, project: &Project) -> ProjectResult<String> {
        validate_project(project)?;
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(project)?,
            Self::Json => serde_json::to_string_pretty(project)?,
        })
    }
}

/// Read a project, picking the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<Project> {
    let text = std::fs::read_to_string(path)?;
    Format::from_path(path).parse(&text)
}

/// Write a project, picking the format from the file extension.
pub fn save(path: &Path, project: &Project) -> ProjectResult<()> {
    let text = Format::from_path(path).render(project)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("a/gap.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("gap.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("gap.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("gap")), Format::Yaml);
    }

    #[test]
    fn parse_reports_syntax_errors_by_format() {
        assert!(matches!(Format::Json.parse("{"), Err(ProjectError::Json(_))));
        assert!(matches!(
            Format::Yaml.parse("version: [unclosed"),
            Err(ProjectError::Yaml(_))
        ));
    }
}
