//! Entity module - Contains all SeaORM entity definitions for the record store.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod assessment;
pub mod exam_type;
pub mod school;
pub mod student;
pub mod subject;

// Re-export specific types to avoid conflicts
pub use assessment::{
    Column as AssessmentColumn, Entity as Assessment, Model as AssessmentModel,
};
pub use exam_type::{Column as ExamTypeColumn, Entity as ExamType, Model as ExamTypeModel};
pub use school::{Column as SchoolColumn, Entity as School, Model as SchoolModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use subject::{Column as SubjectColumn, Entity as Subject, Model as SubjectModel};
