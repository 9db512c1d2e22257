use codenn_ast::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color, written `rgb(r,g,b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BLACK: Self = Self(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("expected 'rgb(r,g,b)', got '{s}'"))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected three components in '{s}'"));
        };
        let channel = |v: &str| {
            v.parse::<u8>()
                .map_err(|_| format!("invalid color component '{v}' in '{s}'"))
        };
        Ok(Self(channel(r)?, channel(g)?, channel(b)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Category to color table shared by every view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPalette {
    pub require: Rgb,
    pub variable: Rgb,
    pub function: Rgb,
    pub interface: Rgb,
    pub other: Rgb,
    pub comment: Rgb,
    /// Color of text not covered by any painted node
    pub neutral: Rgb,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            require: Rgb(248, 172, 97),
            variable: Rgb(169, 208, 165),
            function: Rgb(178, 198, 220),
            interface: Rgb(201, 161, 189),
            other: Rgb(244, 223, 137),
            comment: Rgb(191, 191, 191),
            neutral: Rgb::WHITE,
        }
    }
}

impl CategoryPalette {
    #[must_use]
    pub const fn color(&self, category: Category) -> Rgb {
        match category {
            Category::Require => self.require,
            Category::Variable => self.variable,
            Category::Function => self.function,
            Category::Interface => self.interface,
            Category::Other => self.other,
            Category::Comment => self.comment,
        }
    }

    /// Color for an optional category, neutral when absent
    #[must_use]
    pub const fn fill(&self, category: Option<Category>) -> Rgb {
        match category {
            Some(category) => self.color(category),
            None => self.neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_dashboard_colors() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color(Category::Require).to_string(), "rgb(248,172,97)");
        assert_eq!(palette.color(Category::Variable).to_string(), "rgb(169,208,165)");
        assert_eq!(palette.color(Category::Function).to_string(), "rgb(178,198,220)");
        assert_eq!(palette.color(Category::Interface).to_string(), "rgb(201,161,189)");
        assert_eq!(palette.color(Category::Other).to_string(), "rgb(244,223,137)");
        assert_eq!(palette.fill(None), Rgb::WHITE);
    }

    #[test]
    fn parses_with_or_without_spaces() {
        assert_eq!("rgb(1,2,3)".parse::<Rgb>().unwrap(), Rgb(1, 2, 3));
        assert_eq!("rgb(10, 20, 30)".parse::<Rgb>().unwrap(), Rgb(10, 20, 30));
        assert!("rgb(1,2)".parse::<Rgb>().is_err());
        assert!("rgb(1,2,300)".parse::<Rgb>().is_err());
        assert!("#ffffff".parse::<Rgb>().is_err());
    }

    #[test]
    fn palette_overrides_keep_other_defaults() {
        let palette: CategoryPalette =
            serde_json::from_str(r#"{"comment":"rgb(10, 10, 10)"}"#).unwrap();
        assert_eq!(palette.comment, Rgb(10, 10, 10));
        assert_eq!(palette.require, CategoryPalette::default().require);
    }
}
