//! Package records from `packagedetails`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::listing::FieldKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageField {
    Name,
    PageImage,
    HeaderImage,
    SmallLogo,
    Apps,
    Price,
    Platforms,
    Controller,
    ReleaseDate,
}

impl PackageField {
    pub const ALL: &'static [PackageField] = &[
        PackageField::Name,
        PackageField::PageImage,
        PackageField::HeaderImage,
        PackageField::SmallLogo,
        PackageField::Apps,
        PackageField::Price,
        PackageField::Platforms,
        PackageField::Controller,
        PackageField::ReleaseDate,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            PackageField::Name => "name",
            PackageField::PageImage => "page_image",
            PackageField::HeaderImage => "header_image",
            PackageField::SmallLogo => "small_logo",
            PackageField::Apps => "apps",
            PackageField::Price => "price",
            PackageField::Platforms => "platforms",
            PackageField::Controller => "controller",
            PackageField::ReleaseDate => "release_date",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            PackageField::Name
            | PackageField::PageImage
            | PackageField::HeaderImage
            | PackageField::SmallLogo => FieldKind::Text,
            PackageField::Apps => FieldKind::List,
            PackageField::Price
            | PackageField::Platforms
            | PackageField::Controller
            | PackageField::ReleaseDate => FieldKind::Mapping,
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

/// One app contained in a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageApp {
    pub id: u64,
    pub name: String,
}

/// A package record as returned by the store. `header_image` is often absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PackageListing {
    data: Map<String, Value>,
}

impl PackageListing {
    #[must_use]
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    #[must_use]
    pub fn get(&self, field: PackageField) -> Option<&Value> {
        self.data.get(field.key())
    }

    #[must_use]
    pub fn str(&self, field: PackageField) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str(PackageField::Name)
    }

    pub fn mistyped_fields(&self) -> impl Iterator<Item = PackageField> + '_ {
        PackageField::ALL
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_some_and(|v| !field.kind().admits(v)))
    }

    /// Contained apps. Entries without a numeric id are skipped.
    #[must_use]
    pub fn apps(&self) -> Option<Vec<PackageApp>> {
        let items = self.get(PackageField::Apps)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|app| {
                    let id = app.get("id")?.as_u64()?;
                    let name = app
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned();
                    Some(PackageApp { id, name })
                })
                .collect(),
        )
    }
}
