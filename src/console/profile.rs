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

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::console::types::Source;

/// Frequency table of chunk profiles, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDistribution {
    entries: Vec<(String, usize)>,
}

impl ProfileDistribution {
    pub fn aggregate(sources: &[Source]) -> Self {
        let mut entries: Vec<(String, usize)> = Vec::new();

        for source in sources {
            let profile = source.profile();
            match entries.iter_mut().find(|(name, _)| name == profile) {
                Some((_, count)) => *count += 1,
                None => entries.push((profile.to_string(), 1)),
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct profiles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn count(&self, profile: &str) -> usize {
        self.entries
            .iter()
            .find(|(name, _)| name == profile)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// Serialized as a JSON object keeping first-seen order
impl Serialize for ProfileDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}
