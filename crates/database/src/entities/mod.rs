pub mod grade;
pub mod grade_category;
pub mod grade_subject;
pub mod mentor;
pub mod mentor_assignment;
pub mod santri;
