use crate::{
    entities::{grade_category, grade_subject},
    error::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
};
use serde::{Deserialize, Serialize};

/// Body for creating or updating a subject
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    pub category_id: i32,
    #[serde(default)]
    pub has_hafalan: bool,
    #[serde(default)]
    pub has_setoran: bool,
}

/// A subject together with the name of its category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: grade_subject::Model,
    pub category_name: Option<String>,
}

impl From<(grade_subject::Model, Option<grade_category::Model>)> for SubjectDetail {
    fn from((subject, category): (grade_subject::Model, Option<grade_category::Model>)) -> Self {
        Self {
            subject,
            category_name: category.map(|category| category.name),
        }
    }
}

pub struct SubjectService;

impl SubjectService {
    fn with_category() -> sea_orm::SelectTwo<grade_subject::Entity, grade_category::Entity> {
        Self::ordered(grade_subject::Entity::find()).find_also_related(grade_category::Entity)
    }

    fn ordered(query: Select<grade_subject::Entity>) -> Select<grade_subject::Entity> {
        query
            .order_by_asc(grade_subject::Column::Name)
            .order_by_asc(grade_subject::Column::Id)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<SubjectDetail>, ServiceError> {
        let rows = Self::with_category().all(db).await?;

        Ok(rows.into_iter().map(SubjectDetail::from).collect())
    }

    pub async fn list_by_category(
        db: &DatabaseConnection,
        category_id: i32,
    ) -> Result<Vec<SubjectDetail>, ServiceError> {
        let rows = Self::with_category()
            .filter(grade_subject::Column::CategoryId.eq(category_id))
            .all(db)
            .await?;

        Ok(rows.into_iter().map(SubjectDetail::from).collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<SubjectDetail, ServiceError> {
        Self::with_category()
            .filter(grade_subject::Column::Id.eq(id))
            .one(db)
            .await?
            .map(SubjectDetail::from)
            .ok_or(ServiceError::NotFound("subject"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: SubjectInput,
    ) -> Result<SubjectDetail, ServiceError> {
        let (name, category) = Self::validate(db, &input).await?;
        let now = Utc::now().naive_utc();

        let subject = grade_subject::ActiveModel {
            id: NotSet,
            name: Set(name),
            category_id: Set(category.id),
            has_hafalan: Set(input.has_hafalan),
            has_setoran: Set(input.has_setoran),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok((subject, Some(category)).into())
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: SubjectInput,
    ) -> Result<SubjectDetail, ServiceError> {
        let existing = grade_subject::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("subject"))?;
        let (name, category) = Self::validate(db, &input).await?;

        let mut subject: grade_subject::ActiveModel = existing.into();
        subject.name = Set(name);
        subject.category_id = Set(category.id);
        subject.has_hafalan = Set(input.has_hafalan);
        subject.has_setoran = Set(input.has_setoran);
        subject.updated_at = Set(Utc::now().naive_utc());

        let subject = subject.update(db).await?;
        Ok((subject, Some(category)).into())
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = grade_subject::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("subject"));
        }
        Ok(())
    }

    /// Checks the name and resolves the referenced category
    async fn validate(
        db: &DatabaseConnection,
        input: &SubjectInput,
    ) -> Result<(String, grade_category::Model), ServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("subject name is required"));
        }

        let category = grade_category::Entity::find_by_id(input.category_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::validation(format!("category {} does not exist", input.category_id))
            })?;

        Ok((name.to_owned(), category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::category::{CategoryInput, CategoryService},
        test_util::TestDb,
    };

    async fn category(db: &DatabaseConnection, name: &str) -> i32 {
        let input = CategoryInput {
            name: name.to_string(),
            kind: None,
        };
        CategoryService::create(db, input).await.unwrap().id
    }

    fn input(name: &str, category_id: i32) -> SubjectInput {
        SubjectInput {
            name: name.to_string(),
            category_id,
            has_hafalan: true,
            has_setoran: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_with_category_name() {
        let db = TestDb::new().await;
        let quran = category(&db.conn, "Al-Qur'an").await;
        let adab = category(&db.conn, "Adab").await;

        let created = SubjectService::create(&db.conn, input("Juz 30", quran))
            .await
            .unwrap();
        SubjectService::create(&db.conn, input("Adab Makan", adab))
            .await
            .unwrap();

        assert_eq!(created.category_name.as_deref(), Some("Al-Qur'an"));
        assert!(created.subject.has_hafalan);

        let all = SubjectService::list(&db.conn).await.unwrap();
        let names: Vec<_> = all.iter().map(|detail| detail.subject.name.as_str()).collect();
        assert_eq!(names, ["Adab Makan", "Juz 30"]);

        let quran_subjects = SubjectService::list_by_category(&db.conn, quran)
            .await
            .unwrap();
        assert_eq!(quran_subjects.len(), 1);
        assert_eq!(quran_subjects[0].subject.id, created.subject.id);
    }

    #[tokio::test]
    async fn test_requires_existing_category() {
        let db = TestDb::new().await;

        assert!(matches!(
            SubjectService::create(&db.conn, input("Juz 29", 7)).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_moves_subject_between_categories() {
        let db = TestDb::new().await;
        let quran = category(&db.conn, "Al-Qur'an").await;
        let hadits = category(&db.conn, "Hadits").await;
        let created = SubjectService::create(&db.conn, input("Arbain", quran))
            .await
            .unwrap();

        let updated =
            SubjectService::update(&db.conn, created.subject.id, input("Arbain Nawawi", hadits))
                .await
                .unwrap();
        assert_eq!(updated.subject.category_id, hadits);
        assert_eq!(updated.category_name.as_deref(), Some("Hadits"));

        SubjectService::delete(&db.conn, created.subject.id).await.unwrap();
        assert!(matches!(
            SubjectService::get(&db.conn, created.subject.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_category_removes_subjects() {
        let db = TestDb::new().await;
        let quran = category(&db.conn, "Al-Qur'an").await;
        SubjectService::create(&db.conn, input("Juz 1", quran))
            .await
            .unwrap();

        CategoryService::delete(&db.conn, quran).await.unwrap();

        assert!(SubjectService::list(&db.conn).await.unwrap().is_empty());
    }
}
