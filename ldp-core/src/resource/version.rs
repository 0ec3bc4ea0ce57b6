//! Version containers (Memento TimeMaps)

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::container::{Container, ContainerType};

/// Format an instant as an RFC 1123 HTTP date
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an RFC 1123 HTTP date such as `Tue, 20 Jun 2017 10:11:12 GMT`
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Basic container of mementos plus the datetime of each memento
#[derive(Debug, Clone)]
pub struct VersionContainer {
    pub(crate) container: Container,
    mementos: BTreeMap<String, DateTime<Utc>>,
}

impl Default for VersionContainer {
    fn default() -> Self {
        Self {
            container: Container::new(ContainerType::Basic),
            mementos: BTreeMap::new(),
        }
    }
}

impl VersionContainer {
    pub fn container(&self) -> &Container {
        &self.container
    }

    pub(crate) fn record(&mut self, memento: &str, datetime: DateTime<Utc>) {
        self.mementos.insert(memento.to_string(), datetime);
    }

    pub(crate) fn forget(&mut self, memento: &str) {
        self.mementos.remove(memento);
    }

    /// Mementos ordered by datetime
    pub fn mementos(&self) -> Vec<(&str, DateTime<Utc>)> {
        let mut list: Vec<(&str, DateTime<Utc>)> =
            self.mementos.iter().map(|(uri, dt)| (uri.as_str(), *dt)).collect();
        list.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        list
    }

    /// Memento to serve for `Accept-Datetime: at`.
    ///
    /// The latest memento not after `at`; if every memento is later, the first.
    pub fn memento_at(&self, at: &DateTime<Utc>) -> Option<&str> {
        let list = self.mementos();
        list.iter()
            .rev()
            .find(|(_, dt)| dt <= at)
            .or_else(|| list.first())
            .map(|(uri, _)| *uri)
    }

    /// TimeMap in `application/link-format`
    pub fn timemap(&self, original: &str, self_uri: &str) -> String {
        let mut lines = vec![
            format!("<{original}>; rel=\"original timegate\""),
            format!("<{self_uri}>; rel=\"self\"; type=\"application/link-format\""),
        ];
        for (uri, dt) in self.mementos() {
            lines.push(format!(
                "<{uri}>; rel=\"memento\"; datetime=\"{}\"",
                format_http_date(&dt)
            ));
        }
        lines.join(",\n")
    }
}
