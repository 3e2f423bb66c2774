use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hobby,
    Skill,
    Work,
    Future,
    BeautyHealth,
    Qol,
    Personality,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Hobby,
        Self::Skill,
        Self::Work,
        Self::Future,
        Self::BeautyHealth,
        Self::Qol,
        Self::Personality,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hobby => "hobby",
            Self::Skill => "skill",
            Self::Work => "work",
            Self::Future => "future",
            Self::BeautyHealth => "beauty_health",
            Self::Qol => "qol",
            Self::Personality => "personality",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hobby => "趣味",
            Self::Skill => "特技",
            Self::Work => "仕事",
            Self::Future => "将来",
            Self::BeautyHealth => "美容健康",
            Self::Qol => "QOL",
            Self::Personality => "性格",
            Self::Other => "その他",
        }
    }

    /// Accepts either the stored key or the display label.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value || category.label() == value)
    }

    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|category| category == self)
            .unwrap_or(Self::ALL.len())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Unachieved,
    Achieved,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 2] = [Self::Unachieved, Self::Achieved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unachieved => "unachieved",
            Self::Achieved => "achieved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unachieved => "未達成",
            Self::Achieved => "達成",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value || status.label() == value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalInput {
    pub description: String,
    pub category: Category,
    pub status: GoalStatus,
    pub date: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalChanges {
    pub description: Option<String>,
    pub category: Option<Category>,
    pub status: Option<GoalStatus>,
    pub date: Option<String>,
}

impl GoalChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.date.is_none()
    }
}

impl From<GoalInput> for GoalChanges {
    fn from(input: GoalInput) -> Self {
        Self {
            description: Some(input.description),
            category: Some(input.category),
            status: Some(input.status),
            date: Some(input.date),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalFilter {
    pub category: Option<Category>,
    pub status: Option<GoalStatus>,
    /// Substring matched against the free-text target date.
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}
