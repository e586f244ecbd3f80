//! 服务层测试数据

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    assignments::entities::Assignment,
    courses::entities::Course,
    enrollments::entities::{Enrollment, EnrollmentStatus},
    profiles::entities::{Profile, ProfileRole},
    submissions::entities::Submission,
};
use crate::storage::memory::MemoryStorage;

pub(crate) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
}

fn profile(id: i64, first: &str, last: &str, code: Option<&str>, role: ProfileRole) -> Profile {
    Profile {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.edu", first.to_lowercase()),
        student_code: code.map(str::to_string),
        role,
    }
}

pub(crate) fn instructor() -> Profile {
    profile(1, "Barbara", "Liskov", None, ProfileRole::Teacher)
}

pub(crate) fn admin() -> Profile {
    profile(2, "Root", "Admin", None, ProfileRole::Admin)
}

pub(crate) fn course(id: i64, title: &str, code: &str, instructor_id: i64) -> Course {
    Course {
        id,
        title: title.to_string(),
        code: code.to_string(),
        instructor_id,
    }
}

pub(crate) fn assignment(id: i64, course_id: i64, title: &str, points: f64) -> Assignment {
    Assignment {
        id,
        course_id,
        title: title.to_string(),
        due_date: Some(at(id as u32 % 28 + 1)),
        points,
    }
}

pub(crate) fn enrollment(id: i64, course_id: i64, student_id: i64, active: bool) -> Enrollment {
    Enrollment {
        id,
        course_id,
        student_id,
        status: if active {
            EnrollmentStatus::Active
        } else {
            EnrollmentStatus::Inactive
        },
    }
}

pub(crate) fn submission(
    id: i64,
    assignment_id: i64,
    student_id: i64,
    grade: Option<f64>,
    feedback: Option<&str>,
) -> Submission {
    Submission {
        id,
        assignment_id,
        student_id,
        grade,
        feedback: feedback.map(str::to_string),
        submitted_at: at(10),
        graded_at: grade.map(|_| at(12)),
    }
}

/// 两门课（教师 1）和一门别人的课
///
/// - 课程 1：作业 101（100 分）、102（50 分），学生 10、11、12 在读，13 已退课
/// - 课程 2：作业 201（100 分），学生 10 在读
pub(crate) fn sample_storage() -> MemoryStorage {
    MemoryStorage {
        profiles: vec![
            instructor(),
            admin(),
            profile(10, "Ada", "Lovelace", Some("S010"), ProfileRole::Student),
            profile(11, "Alan", "Turing", None, ProfileRole::Student),
            profile(12, "Grace", "Hopper", Some("S012"), ProfileRole::Student),
        ],
        courses: vec![
            course(1, "Algorithms", "CS101", 1),
            course(2, "Databases", "CS201", 1),
            course(3, "Compilers", "CS301", 5),
        ],
        assignments: vec![
            assignment(101, 1, "Homework 1", 100.0),
            assignment(102, 1, "Essay", 50.0),
            assignment(201, 2, "Project", 100.0),
            assignment(301, 3, "Parser", 100.0),
        ],
        enrollments: vec![
            enrollment(1, 1, 10, true),
            enrollment(2, 1, 11, true),
            enrollment(3, 1, 12, true),
            enrollment(4, 1, 13, false),
            enrollment(5, 2, 10, true),
        ],
        submissions: vec![
            submission(1001, 101, 10, Some(90.0), Some("Well done")),
            submission(1002, 102, 10, Some(40.0), None),
            submission(1003, 101, 11, None, None),
            submission(1004, 201, 10, Some(70.0), Some("Needs tests")),
            submission(1005, 102, 11, Some(0.0), None),
        ],
        ..Default::default()
    }
}
