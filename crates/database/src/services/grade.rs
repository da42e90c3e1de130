use crate::{
    entities::{grade, grade_category, grade_subject, santri},
    error::ServiceError,
};
use chrono::{NaiveDateTime, Utc};
use log::info;
use models::Progress;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    sea_query::{Alias, Expr, OnConflict},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to record progress of a santri in a subject
///
/// Older clients send `id_santri`-style keys, so those are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGrade {
    #[serde(alias = "id_santri")]
    pub santri_id: i32,
    #[serde(alias = "id_pentashih")]
    pub pentashih_id: i32,
    #[serde(alias = "id_category")]
    pub category_id: i32,
    #[serde(alias = "id_subject")]
    pub subject_id: i32,
    #[serde(default)]
    pub hafalan: Option<Progress>,
    #[serde(default)]
    pub setoran: Option<Progress>,
}

/// Partial update of a grade; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GradeChanges {
    #[serde(alias = "id_pentashih")]
    pub pentashih_id: Option<i32>,
    #[serde(alias = "id_category")]
    pub category_id: Option<i32>,
    #[serde(alias = "id_subject")]
    pub subject_id: Option<i32>,
    pub hafalan: Option<Progress>,
    pub setoran: Option<Progress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GradeFilter {
    #[serde(alias = "id_santri")]
    pub santri_id: Option<i32>,
    #[serde(alias = "id_pentashih")]
    pub pentashih_id: Option<i32>,
    #[serde(alias = "id_category")]
    pub category_id: Option<i32>,
    #[serde(alias = "id_subject")]
    pub subject_id: Option<i32>,
}

/// A grade joined with the names of everything it references
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct GradeDetail {
    pub id: i32,
    pub santri_id: i32,
    pub pentashih_id: Option<i32>,
    pub category_id: i32,
    pub subject_id: i32,
    pub hafalan: Progress,
    pub setoran: Progress,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub santri_name: Option<String>,
    pub pentashih_name: Option<String>,
    pub category_name: Option<String>,
    pub subject_name: Option<String>,
    pub has_hafalan: Option<bool>,
    pub has_setoran: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSantri {
    pub code: Option<String>,
    pub fullname: String,
    pub college_year: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSubject {
    #[serde(flatten)]
    pub subject: grade_subject::Model,
    pub hafalan: Progress,
    pub setoran: Progress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCategory {
    #[serde(flatten)]
    pub category: grade_category::Model,
    pub subjects: Vec<ReportSubject>,
}

/// Every category and subject with one santri's progress in each
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub santri: ReportSantri,
    pub categories: Vec<ReportCategory>,
}

pub struct GradeService;

impl GradeService {
    /// Grades joined with santri, pentashih, category and subject names
    fn detailed() -> Select<grade::Entity> {
        let pentashih = Alias::new("pentashih");

        grade::Entity::find()
            .join(JoinType::LeftJoin, grade::Relation::Santri.def())
            .join_as(
                JoinType::LeftJoin,
                grade::Relation::Pentashih.def(),
                pentashih.clone(),
            )
            .join(JoinType::LeftJoin, grade::Relation::Category.def())
            .join(JoinType::LeftJoin, grade::Relation::Subject.def())
            .column_as(santri::Column::Fullname, "santri_name")
            .column_as(
                Expr::col((pentashih, santri::Column::Fullname)),
                "pentashih_name",
            )
            .column_as(grade_category::Column::Name, "category_name")
            .column_as(grade_subject::Column::Name, "subject_name")
            .column(grade_subject::Column::HasHafalan)
            .column(grade_subject::Column::HasSetoran)
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: &GradeFilter,
    ) -> Result<Vec<GradeDetail>, ServiceError> {
        let condition = Condition::all()
            .add_option(filter.santri_id.map(|id| grade::Column::SantriId.eq(id)))
            .add_option(filter.pentashih_id.map(|id| grade::Column::PentashihId.eq(id)))
            .add_option(filter.category_id.map(|id| grade::Column::CategoryId.eq(id)))
            .add_option(filter.subject_id.map(|id| grade::Column::SubjectId.eq(id)));

        Ok(Self::detailed()
            .filter(condition)
            .order_by_asc(grade::Column::SantriId)
            .order_by_asc(grade::Column::CategoryId)
            .order_by_asc(grade::Column::SubjectId)
            .into_model::<GradeDetail>()
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<GradeDetail, ServiceError> {
        Self::detailed()
            .filter(grade::Column::Id.eq(id))
            .into_model::<GradeDetail>()
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("grade"))
    }

    /// Records a grade, updating the existing one for the same santri and
    /// subject instead of adding a second row
    ///
    /// Progress fields left out of `new` start at `belum` on insert and are
    /// untouched on update.
    pub async fn create(
        db: &DatabaseConnection,
        new: NewGrade,
    ) -> Result<GradeDetail, ServiceError> {
        let now = Utc::now().naive_utc();

        let mut update_columns = vec![
            grade::Column::PentashihId,
            grade::Column::CategoryId,
            grade::Column::UpdatedAt,
        ];
        if new.hafalan.is_some() {
            update_columns.push(grade::Column::Hafalan);
        }
        if new.setoran.is_some() {
            update_columns.push(grade::Column::Setoran);
        }

        let active = grade::ActiveModel {
            id: NotSet,
            santri_id: Set(new.santri_id),
            pentashih_id: Set(Some(new.pentashih_id)),
            category_id: Set(new.category_id),
            subject_id: Set(new.subject_id),
            hafalan: Set(new.hafalan.unwrap_or_default()),
            setoran: Set(new.setoran.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        grade::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([grade::Column::SantriId, grade::Column::SubjectId])
                    .update_columns(update_columns)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let stored = Self::detailed()
            .filter(grade::Column::SantriId.eq(new.santri_id))
            .filter(grade::Column::SubjectId.eq(new.subject_id))
            .into_model::<GradeDetail>()
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("grade"))?;

        info!(
            "Recorded grade {} for santri {} in subject {}",
            stored.id, stored.santri_id, stored.subject_id
        );
        Ok(stored)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: GradeChanges,
    ) -> Result<GradeDetail, ServiceError> {
        let existing = grade::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("grade"))?;
        let mut active: grade::ActiveModel = existing.into();

        if let Some(pentashih_id) = changes.pentashih_id {
            active.pentashih_id = Set(Some(pentashih_id));
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(subject_id) = changes.subject_id {
            active.subject_id = Set(subject_id);
        }
        if let Some(hafalan) = changes.hafalan {
            active.hafalan = Set(hafalan);
        }
        if let Some(setoran) = changes.setoran {
            active.setoran = Set(setoran);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;

        Self::get(db, id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = grade::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("grade"));
        }
        Ok(())
    }

    /// Builds the progress report of the santri with the given code
    ///
    /// Subjects without a recorded grade are reported as `belum`.
    pub async fn report_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<GradeReport, ServiceError> {
        let santri = santri::Entity::find()
            .filter(santri::Column::Code.eq(code))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("santri"))?;

        let (grades, categories, subjects) = futures::try_join!(
            grade::Entity::find()
                .filter(grade::Column::SantriId.eq(santri.id))
                .all(db),
            grade_category::Entity::find()
                .order_by_asc(grade_category::Column::Id)
                .all(db),
            grade_subject::Entity::find()
                .order_by_asc(grade_subject::Column::Id)
                .all(db),
        )?;

        let progress: HashMap<i32, (Progress, Progress)> = grades
            .into_iter()
            .map(|grade| (grade.subject_id, (grade.hafalan, grade.setoran)))
            .collect();

        let mut by_category: HashMap<i32, Vec<ReportSubject>> = HashMap::new();
        for subject in subjects {
            let (hafalan, setoran) = progress.get(&subject.id).copied().unwrap_or_default();
            by_category
                .entry(subject.category_id)
                .or_default()
                .push(ReportSubject {
                    subject,
                    hafalan,
                    setoran,
                });
        }

        let categories = categories
            .into_iter()
            .map(|category| ReportCategory {
                subjects: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect();

        Ok(GradeReport {
            santri: ReportSantri {
                code: santri.code,
                fullname: santri.fullname,
                college_year: santri.college_year,
                university: santri.university,
                faculty: santri.faculty,
                major: santri.major,
            },
            categories,
        })
    }
}
