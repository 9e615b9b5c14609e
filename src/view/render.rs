use std::fmt::{self, Display};
use std::str::FromStr;

use crate::models::RecommendationId;

pub const LOADING_MESSAGE: &str = "Loading recommendations...";
pub const ERROR_MESSAGE: &str = "Error loading recommendations.";

/// The two moderation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Pending,
    Approved,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Pending => "Pending",
            Tab::Approved => "Approved",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Pending => write!(f, "pending"),
            Tab::Approved => write!(f, "approved"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Tab::Pending),
            "approved" => Ok(Tab::Approved),
            other => Err(format!("unknown tab '{}', expected pending or approved", other)),
        }
    }
}

/// Approval badge shown on every item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Pending,
    Approved,
}

impl Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Pending => write!(f, "Pending"),
            Badge::Approved => write!(f, "Approved"),
        }
    }
}

/// An action button on an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: &'static str,
    pub disabled: bool,
    /// Spinner in place of the label while the request is outstanding
    pub busy: bool,
}

impl Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.busy {
            write!(f, "[ ... ]")
        } else if self.disabled {
            write!(f, "({})", self.label)
        } else {
            write!(f, "[{}]", self.label)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: RecommendationId,
    pub full_name: String,
    pub profession: String,
    pub rating: Option<f32>,
    pub text: String,
    pub image_url: String,
    pub badge: Badge,
    /// Only pending items can be approved
    pub approve: Option<Control>,
    /// Absent when the delete feature is off
    pub delete: Option<Control>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub active_tab: Tab,
    pub pending_count: usize,
    pub approved_count: usize,
    /// Items of the active tab only
    pub items: Vec<ItemView>,
}

impl ReadyView {
    pub fn count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Pending => self.pending_count,
            Tab::Approved => self.approved_count,
        }
    }

    pub fn item(&self, id: &RecommendationId) -> Option<&ItemView> {
        self.items.iter().find(|item| &item.id == id)
    }
}

/// Snapshot of everything the list view shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Error,
    Ready(ReadyView),
}

impl ListView {
    pub fn ready(&self) -> Option<&ReadyView> {
        match self {
            ListView::Ready(view) => Some(view),
            _ => None,
        }
    }
}

impl Display for ItemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} ({})  <{}>", self.full_name, self.profession, self.badge)?;
        if let Some(rating) = self.rating {
            writeln!(f, "  ⭐ {}", rating)?;
        }
        writeln!(f, "  {}", self.text)?;
        writeln!(f, "  image: {}", self.image_url)?;
        write!(f, "  id: {}", self.id)?;
        for control in [&self.approve, &self.delete].into_iter().flatten() {
            write!(f, "  {}", control)?;
        }
        writeln!(f)
    }
}

impl Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = match self {
            ListView::Loading => return writeln!(f, "{}", LOADING_MESSAGE),
            ListView::Error => return writeln!(f, "{}", ERROR_MESSAGE),
            ListView::Ready(view) => view,
        };

        writeln!(f, "Recommendations")?;
        writeln!(f)?;

        let tabs: Vec<String> = [Tab::Pending, Tab::Approved]
            .into_iter()
            .map(|tab| {
                let header = format!("{} ({})", tab.title(), view.count(tab));
                if tab == view.active_tab {
                    format!("[{}]", header)
                } else {
                    format!(" {} ", header)
                }
            })
            .collect();
        writeln!(f, "{}", tabs.join("  "))?;
        writeln!(f)?;

        if view.items.is_empty() {
            return writeln!(f, "No {} items.", view.active_tab);
        }

        for (i, item) in view.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
