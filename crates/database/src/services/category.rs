use crate::{entities::grade_category, error::ServiceError};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DatabaseConnection, EntityTrait, QueryOrder,
};
use serde::Deserialize;

/// Body for creating or updating a category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl CategoryInput {
    fn validated(self) -> Result<(String, Option<String>), ServiceError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ServiceError::validation("category name is required"));
        }

        let kind = self.kind.filter(|kind| !kind.trim().is_empty());
        Ok((name, kind))
    }
}

pub struct CategoryService;

impl CategoryService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<grade_category::Model>, ServiceError> {
        Ok(grade_category::Entity::find()
            .order_by_asc(grade_category::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<grade_category::Model, ServiceError> {
        grade_category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("category"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: CategoryInput,
    ) -> Result<grade_category::Model, ServiceError> {
        let (name, kind) = input.validated()?;
        let now = Utc::now().naive_utc();

        let category = grade_category::ActiveModel {
            id: NotSet,
            name: Set(name),
            kind: Set(kind),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: CategoryInput,
    ) -> Result<grade_category::Model, ServiceError> {
        let (name, kind) = input.validated()?;
        let mut category: grade_category::ActiveModel = Self::get(db, id).await?.into();

        category.name = Set(name);
        category.kind = Set(kind);
        category.updated_at = Set(Utc::now().naive_utc());

        Ok(category.update(db).await?)
    }

    /// Deletes a category; its subjects and grades go with it
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = grade_category::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("category"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::TestDb;

    fn input(name: &str, kind: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let db = TestDb::new().await;

        let quran = CategoryService::create(&db.conn, input("Al-Qur'an", Some("hafalan")))
            .await
            .unwrap();
        CategoryService::create(&db.conn, input("Adab", None))
            .await
            .unwrap();

        let names: Vec<_> = CategoryService::list(&db.conn)
            .await
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, ["Adab", "Al-Qur'an"]);

        let updated = CategoryService::update(&db.conn, quran.id, input("Tahfidz", Some("")))
            .await
            .unwrap();
        assert_eq!(updated.name, "Tahfidz");
        assert_eq!(updated.kind, None);

        CategoryService::delete(&db.conn, quran.id).await.unwrap();
        assert!(matches!(
            CategoryService::get(&db.conn, quran.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_blank_name_and_unknown_id() {
        let db = TestDb::new().await;

        assert!(matches!(
            CategoryService::create(&db.conn, input("  ", None)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            CategoryService::update(&db.conn, 42, input("Fiqih", None)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            CategoryService::delete(&db.conn, 42).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_input_accepts_type_key() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name": "Doa", "type": "harian"}"#).unwrap();
        assert_eq!(input.kind.as_deref(), Some("harian"));
    }
}
