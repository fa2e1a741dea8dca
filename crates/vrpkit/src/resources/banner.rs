//! Login and shell banners (`header login|shell information "..."`)
//!
//! Banners are tasks with `present`/`absent` states rather than the four
//! reconciliation policies; they map onto `merged` and `deleted`.

use crate::error::{Error, Result};
use crate::schema::Validate;
use reconcile::{Attribute, ConfigurationSet, DiffSet, Instance, Policy, Resource, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Control sequence some VRP releases print in place of a newline inside
/// banner text
const NEWLINE_ARTIFACT: &str = "\u{1b}\u{19}";

/// Which banner a task addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Login,
    Shell,
}

impl BannerKind {
    pub const ALL: [BannerKind; 2] = [BannerKind::Login, BannerKind::Shell];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for BannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Banner task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerState {
    #[default]
    Present,
    Absent,
}

impl From<BannerState> for Policy {
    fn from(state: BannerState) -> Self {
        match state {
            BannerState::Present => Policy::Merged,
            BannerState::Absent => Policy::Deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannerConfig {
    pub banner: BannerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl BannerConfig {
    pub fn new(banner: BannerKind, text: Option<&str>) -> Self {
        Self {
            banner,
            text: text.map(str::to_string),
        }
    }

    /// Parse the quoted text out of `display current-configuration` output
    pub fn from_running_config(banner: BannerKind, output: &str) -> Self {
        let text = output
            .find('"')
            .zip(output.rfind('"'))
            .filter(|(start, end)| start < end)
            .map(|(start, end)| output[start + 1..end].replace(NEWLINE_ARTIFACT, "\n"))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Self { banner, text }
    }

    pub fn to_instance(&self) -> Instance<BannerAttr> {
        Instance::identity_only(self.banner.as_str())
            .with_opt(BannerAttr::Text, self.text.as_deref().map(str::trim))
    }
}

impl Validate for BannerConfig {
    const RESOURCE: &'static str = "banner";

    fn validate(&self) -> Result<()> {
        if let Some(text) = self.text.as_deref().map(str::trim)
            && text.lines().any(|line| line.trim().is_empty())
        {
            return Err(Error::validation(
                Self::RESOURCE,
                format!("{} banner text must not contain empty lines", self.banner),
            ));
        }
        Ok(())
    }
}

/// Desired state for one banner task
///
/// `absent` only needs the banner name; `present` requires text.
pub fn want_set(config: &BannerConfig, state: BannerState) -> Result<ConfigurationSet<BannerAttr>> {
    match state {
        BannerState::Present => {
            if config.text.as_deref().is_none_or(|t| t.trim().is_empty()) {
                return Err(Error::validation(
                    BannerConfig::RESOURCE,
                    "state is present but text is missing",
                ));
            }
            Ok(vec![config.to_instance()].into())
        }
        BannerState::Absent => Ok(vec![Instance::identity_only(config.banner.as_str())].into()),
    }
}

/// Observed banners, with an identity-only entry for each banner the
/// device does not carry so that `present` can create it
pub fn have_set(configs: &[BannerConfig]) -> ConfigurationSet<BannerAttr> {
    BannerKind::ALL
        .iter()
        .map(|kind| {
            configs
                .iter()
                .find(|c| c.banner == *kind)
                .map_or_else(|| Instance::identity_only(kind.as_str()), BannerConfig::to_instance)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BannerAttr {
    Text,
}

impl Attribute for BannerAttr {
    fn all() -> &'static [Self] {
        &[Self::Text]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
        }
    }
}

/// Command emitter for banners
#[derive(Debug, Clone, Copy, Default)]
pub struct Banner;

impl Resource for Banner {
    type Attr = BannerAttr;

    fn resource_type(&self) -> &'static str {
        "banner"
    }

    fn scope(&self, _identity: &str) -> Option<Scope> {
        None
    }

    fn supports(&self, policy: Policy) -> bool {
        matches!(policy, Policy::Merged | Policy::Deleted)
    }

    fn set_commands(
        &self,
        identity: &str,
        diff: &DiffSet<BannerAttr>,
        _want: &Instance<BannerAttr>,
        _have: &Instance<BannerAttr>,
    ) -> Vec<String> {
        diff.new_value(BannerAttr::Text)
            .filter(|v| v.is_truthy())
            .map(|text| vec![format!("header {identity} information \"\n{text}\"")])
            .unwrap_or_default()
    }

    fn clear_commands(
        &self,
        identity: &str,
        stale: &DiffSet<BannerAttr>,
        _have: &Instance<BannerAttr>,
    ) -> Vec<String> {
        if stale.drops(BannerAttr::Text) {
            vec![format!("undo header {identity}")]
        } else {
            Vec::new()
        }
    }
}
