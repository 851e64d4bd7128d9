use super::Reporter;
use crate::gradle::GradleUpdateResult;
use crate::report::{DependenciesGroup, Dependency, ReportEntry, ReportResult};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};

/// XML report rooted at `<response>`. Missing values are written as empty
/// elements so every record has the same shape.
pub struct XmlReporter;

struct XmlDocument<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlDocument<W> {
    fn new(out: W) -> Self {
        Self {
            writer: Writer::new_with_indent(out, b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> io::Result<()> {
        self.writer.write_event(event).map_err(io::Error::other)
    }

    fn start(&mut self, name: &str) -> io::Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> io::Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, name: &str, value: Option<&str>) -> io::Result<()> {
        match value {
            Some(value) if !value.is_empty() => {
                self.start(name)?;
                self.event(Event::Text(BytesText::new(value)))?;
                self.end(name)
            }
            _ => self.event(Event::Empty(BytesStart::new(name))),
        }
    }

    fn value(&mut self, name: &str, value: impl ToString) -> io::Result<()> {
        self.text(name, Some(&value.to_string()))
    }

    fn dependency_fields(&mut self, dependency: &Dependency) -> io::Result<()> {
        self.text("group", Some(&dependency.group))?;
        self.text("name", Some(&dependency.name))?;
        self.text("version", dependency.version.as_deref())?;
        self.text("projectUrl", dependency.project_url.as_deref())?;
        self.text("userReason", dependency.user_reason.as_deref())
    }

    /// Writes `<name><count/><dependencies>...</dependencies></name>`,
    /// letting `extra` append the fields specific to the group.
    fn group<T, F>(
        &mut self,
        name: &str,
        element: &str,
        group: &DependenciesGroup<T>,
        mut extra: F,
    ) -> io::Result<()>
    where
        T: ReportEntry,
        F: FnMut(&mut Self, &T) -> io::Result<()>,
    {
        self.start(name)?;
        self.value("count", group.count)?;
        self.start("dependencies")?;
        for entry in &group.dependencies {
            self.start(element)?;
            self.dependency_fields(entry.dependency())?;
            extra(self, entry)?;
            self.end(element)?;
        }
        self.end("dependencies")?;
        self.end(name)
    }

    fn gradle_update(&mut self, name: &str, update: &GradleUpdateResult) -> io::Result<()> {
        self.start(name)?;
        self.text("version", Some(&update.version))?;
        self.value("isUpdateAvailable", update.is_update_available)?;
        self.value("isFailure", update.is_failure)?;
        self.text("reason", Some(&update.reason))?;
        self.end(name)
    }

    fn write(mut self, result: &ReportResult) -> io::Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        self.start("response")?;
        self.value("count", result.count)?;

        self.group("current", "dependency", &result.current, |_, _| Ok(()))?;
        self.group("outdated", "outdatedDependency", &result.outdated, |doc, entry| {
            doc.start("available")?;
            doc.text("release", entry.available.release.as_deref())?;
            doc.text("milestone", entry.available.milestone.as_deref())?;
            doc.text("integration", entry.available.integration.as_deref())?;
            doc.end("available")
        })?;
        self.group("exceeded", "exceededDependency", &result.exceeded, |doc, entry| {
            doc.text("latest", Some(&entry.latest))
        })?;
        self.group("undeclared", "dependency", &result.undeclared, |_, _| Ok(()))?;
        self.group("unresolved", "unresolvedDependency", &result.unresolved, |doc, entry| {
            doc.text("reason", Some(&entry.reason))
        })?;

        let gradle = &result.gradle;
        self.start("gradle")?;
        self.value("enabled", gradle.enabled)?;
        self.gradle_update("running", &gradle.running)?;
        self.gradle_update("current", &gradle.current)?;
        self.gradle_update("releaseCandidate", &gradle.release_candidate)?;
        self.gradle_update("nightly", &gradle.nightly)?;
        self.end("gradle")?;

        self.end("response")?;
        writeln!(self.writer.get_mut())
    }
}

impl Reporter for XmlReporter {
    fn write(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        XmlDocument::new(out).write(result)
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::fixtures;

    fn render(result: &ReportResult) -> String {
        let mut buffer = Vec::new();
        XmlReporter.write(&mut buffer, result).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn writes_standalone_declaration_and_root() {
        let xml = render(&fixtures::empty());
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<response>\n  <count>0</count>\n  <current>"));
        assert!(xml.trim_end().ends_with("</response>"));
    }

    #[test]
    fn uses_group_specific_element_names() {
        let xml = render(&fixtures::sample());
        for element in [
            "<dependency>",
            "<outdatedDependency>",
            "<exceededDependency>",
            "<unresolvedDependency>",
            "<latest>2.3.12</latest>",
            "<milestone>33.2.1-jre</milestone>",
            "<reason>Could not find any version</reason>",
            "<releaseCandidate>",
            "<isFailure>true</isFailure>",
        ] {
            assert!(xml.contains(element), "missing {element}");
        }
    }

    #[test]
    fn missing_values_become_empty_elements() {
        let xml = render(&fixtures::sample());
        assert!(xml.contains("<name>junit-bom</name>\n        <version/>\n        <projectUrl/>"));
        assert!(xml.contains("<release/>"));
    }

    #[test]
    fn escapes_text_content() {
        let mut result = fixtures::empty();
        result.gradle.running.reason = "a < b & c".to_string();
        let xml = render(&result);
        assert!(xml.contains("<reason>a &lt; b &amp; c</reason>"));
    }
}
