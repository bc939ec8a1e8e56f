//! Title records from `appdetails`.
//!
//! The record is the store's `data` object kept as-is: a field the store did
//! not send is missing, never defaulted. Typed views (`name`, `text`,
//! `requirements`, ...) are read on demand.

use serde::Serialize;
use serde_json::{Map, Value};
use storefront_core::config::DEFAULT_COMMUNITY_LINK_PREFIX;
use storefront_core::{
    BundleCategory, RequirementPlatform, RequirementSet, ReviewEntry, TextFormat,
};

use crate::error::ScraperError;
use crate::requirements::parse_requirements;
use crate::reviews::parse_reviews_with_prefix;
use crate::text::{language_list, normalize_languages, normalize_markup};

/// Declared JSON shape of a catalogued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Boolean,
    Integer,
    List,
    Mapping,
}

impl FieldKind {
    /// Whether `value` has this shape. `null` is accepted for every kind, as
    /// are the store's usual encodings: numeric strings for integers, `0`/`1`
    /// for booleans and an empty array for an empty mapping.
    #[must_use]
    pub fn admits(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null)
            | (FieldKind::Text, Value::String(_))
            | (FieldKind::Boolean, Value::Bool(_))
            | (FieldKind::List, Value::Array(_))
            | (FieldKind::Mapping, Value::Object(_)) => true,
            (FieldKind::Boolean, Value::Number(n)) => matches!(n.as_u64(), Some(0 | 1)),
            (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldKind::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
            (FieldKind::Mapping, Value::Array(items)) => items.is_empty(),
            _ => false,
        }
    }
}

macro_rules! title_fields {
    ($($variant:ident => $key:literal, $kind:ident;)+) => {
        /// Fields of a title record, keyed as the store sends them.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TitleField {
            $($variant,)+
        }

        impl TitleField {
            pub const ALL: &'static [TitleField] = &[$(TitleField::$variant,)+];

            #[must_use]
            pub fn key(self) -> &'static str {
                match self {
                    $(TitleField::$variant => $key,)+
                }
            }

            #[must_use]
            pub fn kind(self) -> FieldKind {
                match self {
                    $(TitleField::$variant => FieldKind::$kind,)+
                }
            }
        }
    };
}

title_fields! {
    Type => "type", Text;
    Name => "name", Text;
    SteamAppid => "steam_appid", Integer;
    RequiredAge => "required_age", Integer;
    IsFree => "is_free", Boolean;
    ControllerSupport => "controller_support", Text;
    Dlc => "dlc", List;
    DetailedDescription => "detailed_description", Text;
    AboutTheGame => "about_the_game", Text;
    ShortDescription => "short_description", Text;
    Fullgame => "fullgame", Mapping;
    SupportedLanguages => "supported_languages", Text;
    Reviews => "reviews", Text;
    HeaderImage => "header_image", Text;
    Website => "website", Text;
    PcRequirements => "pc_requirements", Mapping;
    MacRequirements => "mac_requirements", Mapping;
    LinuxRequirements => "linux_requirements", Mapping;
    LegalNotice => "legal_notice", Text;
    Developers => "developers", List;
    Publishers => "publishers", List;
    Demos => "demos", List;
    PriceOverview => "price_overview", Mapping;
    Packages => "packages", List;
    PackageGroups => "package_groups", List;
    Platforms => "platforms", Mapping;
    Metacritic => "metacritic", Mapping;
    Categories => "categories", List;
    Genres => "genres", List;
    Screenshots => "screenshots", List;
    Movies => "movies", List;
    Recommendations => "recommendations", Mapping;
    Achievements => "achievements", Mapping;
    ReleaseDate => "release_date", Mapping;
    SupportInfo => "support_info", Mapping;
    Background => "background", Text;
    ContentDescriptors => "content_descriptors", Mapping;
}

impl TitleField {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    fn requirements(platform: RequirementPlatform) -> Self {
        match platform {
            RequirementPlatform::Pc => TitleField::PcRequirements,
            RequirementPlatform::Mac => TitleField::MacRequirements,
            RequirementPlatform::Linux => TitleField::LinuxRequirements,
        }
    }
}

/// A text field rendered in one of the [`TextFormat`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormattedText {
    Text(String),
    Items(Vec<String>),
    Reviews(Vec<ReviewEntry>),
}

/// A title record as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StoreListing {
    data: Map<String, Value>,
}

impl StoreListing {
    #[must_use]
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The field's value exactly as sent, or `None` when the store omitted it.
    #[must_use]
    pub fn get(&self, field: TitleField) -> Option<&Value> {
        self.data.get(field.key())
    }

    #[must_use]
    pub fn str(&self, field: TitleField) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str(TitleField::Name)
    }

    /// The record's own app id, as a number or numeric string.
    #[must_use]
    pub fn steam_appid(&self) -> Option<u64> {
        match self.get(TitleField::SteamAppid)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Catalogued fields whose value does not have the declared shape.
    pub fn mistyped_fields(&self) -> impl Iterator<Item = TitleField> + '_ {
        TitleField::ALL
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_some_and(|v| !field.kind().admits(v)))
    }

    /// A list of plain strings (`developers`, `publishers`).
    #[must_use]
    pub fn string_list(&self, field: TitleField) -> Option<Vec<String>> {
        let items = self.get(field)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Descriptions of a `[{ id, description }]` list (`genres`, `categories`).
    #[must_use]
    pub fn descriptions(&self, field: TitleField) -> Option<Vec<String>> {
        let items = self.get(field)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.get("description").and_then(Value::as_str))
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Feature categories as `{ id, label }` pairs. Ids arrive as numbers or
    /// numeric strings; entries without a usable id or label are skipped.
    #[must_use]
    pub fn categories(&self) -> Option<Vec<BundleCategory>> {
        let items = self.get(TitleField::Categories)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| {
                    let id = match item.get("id")? {
                        Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
                        Value::String(s) => s.trim().parse().ok()?,
                        _ => return None,
                    };
                    let label = item.get("description")?.as_str()?.to_owned();
                    Some(BundleCategory { id, label })
                })
                .collect(),
        )
    }

    /// Renders a text field, stripping the default redirect prefix from
    /// review links.
    ///
    /// # Errors
    ///
    /// [`ScraperError::UnsupportedFormat`] when the field has no such
    /// rendering.
    pub fn text(
        &self,
        field: TitleField,
        format: TextFormat,
    ) -> Result<Option<FormattedText>, ScraperError> {
        self.text_with_link_prefix(field, format, DEFAULT_COMMUNITY_LINK_PREFIX)
    }

    /// Renders a text field.
    ///
    /// Every text field supports `raw` and `normal`. `list` is available for
    /// `supported_languages` (one entry per language) and `reviews` (parsed
    /// entries with `link_prefix` stripped). The format is checked before
    /// the field, so an unsupported format is an error even when the field
    /// is missing.
    ///
    /// # Errors
    ///
    /// [`ScraperError::UnsupportedFormat`] when the field is not a text field
    /// or has no such rendering.
    pub fn text_with_link_prefix(
        &self,
        field: TitleField,
        format: TextFormat,
        link_prefix: &str,
    ) -> Result<Option<FormattedText>, ScraperError> {
        let supported = field.kind() == FieldKind::Text
            && (format != TextFormat::List
                || matches!(field, TitleField::SupportedLanguages | TitleField::Reviews));
        if !supported {
            return Err(ScraperError::UnsupportedFormat {
                field: field.key().to_owned(),
                format: format.to_string(),
            });
        }

        let Some(raw) = self.str(field) else {
            return Ok(None);
        };
        let rendered = match (field, format) {
            (_, TextFormat::Raw) => FormattedText::Text(raw.to_owned()),
            (TitleField::SupportedLanguages, TextFormat::Normal) => {
                FormattedText::Text(normalize_languages(raw))
            }
            (TitleField::SupportedLanguages, TextFormat::List) => {
                FormattedText::Items(language_list(raw))
            }
            (TitleField::Reviews, TextFormat::List) => {
                FormattedText::Reviews(parse_reviews_with_prefix(raw, link_prefix))
            }
            (_, _) => FormattedText::Text(normalize_markup(raw)),
        };
        Ok(Some(rendered))
    }

    /// Parsed requirement tiers for a platform, or `None` when the field is
    /// missing.
    #[must_use]
    pub fn requirements(&self, platform: RequirementPlatform) -> Option<RequirementSet> {
        self.get(TitleField::requirements(platform))
            .map(parse_requirements)
    }
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
