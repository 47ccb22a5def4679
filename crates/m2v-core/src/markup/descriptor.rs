//! Descriptor (`pom.xml`) reading.
//!
//! Only the parts the resolver needs are extracted: the project's own
//! coordinates and the direct `<dependencies>` list. Parent descriptors,
//! `<dependencyManagement>` and profiles are not followed.

use m2v_schema::Dependency;
use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("not well-formed XML: {0}")]
    Xml(String),

    #[error("no <project> root element")]
    MissingProject,

    #[error("<project> declares no <version>")]
    MissingVersion,
}

/// The resolver's view of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: String,
    /// Direct dependencies in declaration order, versions unsubstituted.
    pub dependencies: Vec<Dependency>,
    /// Dependency entries missing a coordinate, rendered as `g:a:v` with `?` holes.
    pub incomplete: Vec<String>,
}

impl ProjectDescriptor {
    /// `group:artifact:version`, with `?` for a coordinate inherited from a
    /// parent descriptor.
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id.as_deref().unwrap_or("?"),
            self.artifact_id.as_deref().unwrap_or("?"),
            self.version
        )
    }
}

#[derive(Default)]
struct PartialDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

impl PartialDependency {
    fn finish(self) -> Result<Dependency, String> {
        match (self.group_id, self.artifact_id, self.version) {
            (Some(g), Some(a), Some(v)) => Ok(Dependency::new(g, a, v)),
            (g, a, v) => Err(format!(
                "{}:{}:{}",
                g.as_deref().unwrap_or("?"),
                a.as_deref().unwrap_or("?"),
                v.as_deref().unwrap_or("?")
            )),
        }
    }
}

#[derive(Default)]
struct Builder {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    dependencies: Vec<Dependency>,
    incomplete: Vec<String>,
    current: Option<PartialDependency>,
}

impl Builder {
    fn open(&mut self, path: &[&str]) {
        if path == ["project", "dependencies", "dependency"] {
            self.current = Some(PartialDependency::default());
        }
    }

    fn text(&mut self, path: &[&str], value: &str) {
        let slot = match path {
            ["project", "groupId"] => &mut self.group_id,
            ["project", "artifactId"] => &mut self.artifact_id,
            ["project", "version"] => &mut self.version,
            ["project", "dependencies", "dependency", field] => {
                let Some(dep) = self.current.as_mut() else {
                    return;
                };
                match *field {
                    "groupId" => &mut dep.group_id,
                    "artifactId" => &mut dep.artifact_id,
                    "version" => &mut dep.version,
                    _ => return,
                }
            }
            _ => return,
        };
        slot.get_or_insert_with(String::new).push_str(value);
    }

    fn close(&mut self, path: &[&str]) {
        if path == ["project", "dependencies", "dependency"] {
            if let Some(dep) = self.current.take() {
                match dep.finish() {
                    Ok(dep) => self.dependencies.push(dep),
                    Err(partial) => self.incomplete.push(partial),
                }
            }
        }
    }

    fn build(self) -> Result<ProjectDescriptor, DescriptorError> {
        let version = self
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or(DescriptorError::MissingVersion)?;
        Ok(ProjectDescriptor {
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version,
            dependencies: self.dependencies,
            incomplete: self.incomplete,
        })
    }
}

/// Parse descriptor text.
///
/// # Errors
///
/// Returns [`DescriptorError::Xml`] if the text is not well-formed,
/// [`DescriptorError::MissingProject`] if the root element is not
/// `<project>`, and [`DescriptorError::MissingVersion`] if the project has no
/// version of its own.
pub fn parse_descriptor(text: &str) -> Result<ProjectDescriptor, DescriptorError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut builder = Builder::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            DescriptorError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if path.is_empty() {
                    if seen_root || name != "project" {
                        return Err(DescriptorError::MissingProject);
                    }
                    seen_root = true;
                }
                path.push(name);
                builder.open(&as_slices(&path));
            }
            Event::Empty(e) => {
                if path.is_empty() {
                    if seen_root || e.local_name().as_ref() != b"project" {
                        return Err(DescriptorError::MissingProject);
                    }
                    seen_root = true;
                }
            }
            Event::Text(t) => {
                let value = t
                    .unescape()
                    .map_err(|e| DescriptorError::Xml(e.to_string()))?;
                builder.text(&as_slices(&path), &value);
            }
            Event::CData(c) => {
                let value = String::from_utf8_lossy(&c).into_owned();
                builder.text(&as_slices(&path), &value);
            }
            Event::End(_) => {
                builder.close(&as_slices(&path));
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(DescriptorError::Xml(format!(
            "unexpected end of document inside <{}>",
            path.last().map_or("", String::as_str)
        )));
    }
    if !seen_root {
        return Err(DescriptorError::MissingProject);
    }

    builder.build()
}

fn as_slices(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAGGER_ANDROID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.google.dagger</groupId>
    <artifactId>dagger-parent</artifactId>
    <version>9.9.9</version>
  </parent>
  <groupId>com.google.dagger</groupId>
  <artifactId>dagger-android</artifactId>
  <version>2.3.1</version>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>managed</groupId>
        <artifactId>only</artifactId>
        <version>1</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>com.google.dagger</groupId>
      <artifactId>dagger</artifactId>
      <version>${project.version}</version>
    </dependency>
    <dependency>
      <groupId>androidx.annotation</groupId>
      <artifactId>annotation</artifactId>
      <version>1.3.0</version>
      <scope>compile</scope>
    </dependency>
    <dependency>
      <groupId>javax.inject</groupId>
      <artifactId>javax.inject</artifactId>
    </dependency>
  </dependencies>
</project>"#;

    #[test]
    fn test_reads_project_and_dependencies() {
        let pom = parse_descriptor(DAGGER_ANDROID).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("com.google.dagger"));
        assert_eq!(pom.artifact_id.as_deref(), Some("dagger-android"));
        assert_eq!(pom.version, "2.3.1");
        assert_eq!(
            pom.dependencies,
            vec![
                Dependency::new("com.google.dagger", "dagger", "${project.version}"),
                Dependency::new("androidx.annotation", "annotation", "1.3.0"),
            ]
        );
        assert_eq!(pom.incomplete, vec!["javax.inject:javax.inject:?".to_string()]);
    }

    #[test]
    fn test_single_dependency_and_empty_list() {
        let pom = parse_descriptor(
            "<project><version>1.0</version><dependencies><dependency>\
             <groupId>a</groupId><artifactId>b</artifactId><version>2</version>\
             </dependency></dependencies></project>",
        )
        .unwrap();
        assert_eq!(pom.dependencies, vec![Dependency::new("a", "b", "2")]);

        let pom = parse_descriptor("<project><version>1.0</version><dependencies/></project>")
            .unwrap();
        assert!(pom.dependencies.is_empty());
    }

    #[test]
    fn test_coordinates_mark_inherited_parts() {
        let pom = parse_descriptor(DAGGER_ANDROID).unwrap();
        assert_eq!(pom.coordinates(), "com.google.dagger:dagger-android:2.3.1");

        let pom = parse_descriptor(
            "<project><parent><groupId>p</groupId></parent>\
             <artifactId>child</artifactId><version>3</version></project>",
        )
        .unwrap();
        assert_eq!(pom.coordinates(), "?:child:3");
    }

    #[test]
    fn test_missing_version_is_malformed() {
        let err = parse_descriptor(
            "<project><parent><version>1</version></parent><artifactId>x</artifactId></project>",
        )
        .unwrap_err();
        assert_eq!(err, DescriptorError::MissingVersion);
    }

    #[test]
    fn test_wrong_root_or_garbage() {
        assert_eq!(
            parse_descriptor("<metadata><version>1</version></metadata>").unwrap_err(),
            DescriptorError::MissingProject
        );
        assert_eq!(
            parse_descriptor("<!DOCTYPE html> just text").unwrap_err(),
            DescriptorError::MissingProject
        );
        assert!(parse_descriptor("<project><version>1</version>").is_err());
        assert!(parse_descriptor("<project><version>1</oops></project>").is_err());
    }
}
