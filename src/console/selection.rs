// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;

use crate::console::types::Source;

pub const NO_SELECTION_LABEL: &str = "Select a source to show its PDF page.";

/// Display label for the active selection
pub fn describe(selection: Option<&Source>) -> String {
    match selection {
        None => NO_SELECTION_LABEL.to_string(),
        Some(source) => format!(
            "{} · p.{} · chunk {}",
            source.pdf_id,
            source.display_page(),
            source.chunk_id
        ),
    }
}

/// Viewer panel bindings derived from the selection. URLs are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerBinding {
    pub label: String,
    pub viewer_url: Option<String>,
    pub page_image_url: Option<String>,
}

pub fn bind(selection: Option<&Source>) -> ViewerBinding {
    ViewerBinding {
        label: describe(selection),
        viewer_url: selection.map(|s| s.viewer_url.clone()),
        page_image_url: selection
            .and_then(|s| s.page_image_url.clone())
            .filter(|url| !url.is_empty()),
    }
}

/// Short page marker for the header stats ("p.5" or "-")
pub fn page_marker(selection: Option<&Source>) -> String {
    selection
        .map(|s| format!("p.{}", s.display_page()))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::types::sample_source;

    #[test]
    fn test_placeholder_without_selection() {
        assert_eq!(describe(None), NO_SELECTION_LABEL);
        assert_eq!(page_marker(None), "-");
    }

    #[test]
    fn test_label_uses_one_based_page() {
        let source = sample_source("doc1", 4, 7, None);
        let label = describe(Some(&source));

        assert!(label.contains("doc1"));
        assert!(label.contains("p.5"));
        assert!(label.contains("chunk 7"));
        assert_eq!(label, "doc1 · p.5 · chunk 7");
        assert_eq!(page_marker(Some(&source)), "p.5");
    }

    #[test]
    fn test_label_for_last_page_index() {
        let mut source = sample_source("scan", 0, 2, None);
        source.page_no = u32::MAX;

        assert_eq!(describe(Some(&source)), "scan · p.4294967296 · chunk 2");
        assert_eq!(page_marker(Some(&source)), "p.4294967296");
    }

    #[test]
    fn test_binding_passes_urls_verbatim() {
        let mut source = sample_source("doc1", 0, 1, None);
        source.viewer_url = "http://x/viewer?file=a b.pdf#page=1".to_string();
        source.page_image_url = Some("http://x/img?p=0&zoom=2.0".to_string());

        let binding = bind(Some(&source));
        assert_eq!(
            binding.viewer_url.as_deref(),
            Some("http://x/viewer?file=a b.pdf#page=1")
        );
        assert_eq!(
            binding.page_image_url.as_deref(),
            Some("http://x/img?p=0&zoom=2.0")
        );
    }

    #[test]
    fn test_binding_without_selection_or_image() {
        let empty = bind(None);
        assert_eq!(empty.label, NO_SELECTION_LABEL);
        assert_eq!(empty.viewer_url, None);
        assert_eq!(empty.page_image_url, None);

        let mut source = sample_source("doc1", 0, 1, None);
        source.page_image_url = Some(String::new());
        assert_eq!(bind(Some(&source)).page_image_url, None);
    }
}
