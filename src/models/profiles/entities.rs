use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum ProfileRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl ProfileRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn teacher_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Teacher, &Self::Admin]
    }
}

impl<'de> Deserialize<'de> for ProfileRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            ProfileRole::STUDENT => Ok(ProfileRole::Student),
            ProfileRole::TEACHER => Ok(ProfileRole::Teacher),
            ProfileRole::ADMIN => Ok(ProfileRole::Admin),
            _ => Err(serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, admin"
            ))),
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Student => write!(f, "{}", ProfileRole::STUDENT),
            ProfileRole::Teacher => write!(f, "{}", ProfileRole::TEACHER),
            ProfileRole::Admin => write!(f, "{}", ProfileRole::ADMIN),
        }
    }
}

impl std::str::FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(ProfileRole::Student),
            "teacher" => Ok(ProfileRole::Teacher),
            "admin" => Ok(ProfileRole::Admin),
            _ => Err(format!("Invalid profile role: {s}")),
        }
    }
}

// 用户资料实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// 学号
    pub student_code: Option<String>,
    pub role: ProfileRole,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ProfileRole::Admin
    }
}
