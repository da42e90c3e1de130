use crate::{
    entities::{mentor, mentor_assignment, santri},
    error::ServiceError,
};
use chrono::Utc;
use log::info;
use models::{Gender, membership};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use std::collections::HashMap;

/// A santri under a pentashih's supervision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mentee {
    pub id: i32,
    pub name: String,
    pub gender: Option<Gender>,
    pub college_year: Option<String>,
}

impl From<santri::Model> for Mentee {
    fn from(santri: santri::Model) -> Self {
        Self {
            id: santri.id,
            name: santri.fullname,
            gender: santri.gender,
            college_year: santri.college_year,
        }
    }
}

/// A pentashih together with everyone assigned to them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorDetail {
    /// The pentashih's own santri id
    pub id: i32,
    pub name: String,
    pub gender: Option<Gender>,
    pub santri_list: Vec<Mentee>,
}

pub struct PentashihService;

impl PentashihService {
    /// All pentashih ordered by name, each with their mentees
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<MentorDetail>, ServiceError> {
        let mentors = mentor::Entity::find()
            .find_also_related(santri::Entity)
            .order_by_asc(santri::Column::Fullname)
            .all(db)
            .await?;

        let mut mentees: HashMap<i32, Vec<Mentee>> = HashMap::new();
        for (mentor_id, mentee) in Self::assignments(db, None).await? {
            mentees.entry(mentor_id).or_default().push(mentee);
        }

        Ok(mentors
            .into_iter()
            .filter_map(|(mentor, santri)| {
                let santri = santri?;
                Some(MentorDetail {
                    id: mentor.santri_id,
                    name: santri.fullname,
                    gender: santri.gender,
                    santri_list: mentees.remove(&mentor.santri_id).unwrap_or_default(),
                })
            })
            .collect())
    }

    pub async fn get(
        db: &DatabaseConnection,
        mentor_id: i32,
    ) -> Result<MentorDetail, ServiceError> {
        let (mentor, santri) = mentor::Entity::find_by_id(mentor_id)
            .find_also_related(santri::Entity)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("pentashih"))?;
        let santri = santri.ok_or(ServiceError::NotFound("santri"))?;

        let santri_list = Self::assignments(db, Some(mentor.santri_id))
            .await?
            .into_iter()
            .map(|(_, mentee)| mentee)
            .collect();

        Ok(MentorDetail {
            id: mentor.santri_id,
            name: santri.fullname,
            gender: santri.gender,
            santri_list,
        })
    }

    pub async fn mentees(
        db: &DatabaseConnection,
        mentor_id: i32,
    ) -> Result<Vec<Mentee>, ServiceError> {
        Self::ensure_mentor(db, mentor_id).await?;

        Ok(Self::assignments(db, Some(mentor_id))
            .await?
            .into_iter()
            .map(|(_, mentee)| mentee)
            .collect())
    }

    /// Makes an existing santri a pentashih and assigns the given mentees
    pub async fn create(
        db: &DatabaseConnection,
        mentor_id: i32,
        santri_ids: &[i32],
    ) -> Result<MentorDetail, ServiceError> {
        let txn = db.begin().await?;

        santri::Entity::find_by_id(mentor_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("santri"))?;

        if mentor::Entity::find_by_id(mentor_id).one(&txn).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "santri {mentor_id} is already a pentashih"
            )));
        }

        let now = Utc::now().naive_utc();
        mentor::Entity::insert(mentor::ActiveModel {
            santri_id: Set(mentor_id),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_without_returning(&txn)
        .await?;

        Self::reconcile(&txn, mentor_id, santri_ids).await?;
        txn.commit().await?;

        info!("Created pentashih {mentor_id} with {} santri", santri_ids.len());
        Self::get(db, mentor_id).await
    }

    /// Replaces the mentee set of a pentashih
    ///
    /// Only the difference between the stored and the requested set is
    /// written, all within one transaction.
    pub async fn replace_mentees(
        db: &DatabaseConnection,
        mentor_id: i32,
        santri_ids: &[i32],
    ) -> Result<MentorDetail, ServiceError> {
        let txn = db.begin().await?;

        Self::ensure_mentor(&txn, mentor_id).await?;
        Self::reconcile(&txn, mentor_id, santri_ids).await?;

        mentor::Entity::update_many()
            .col_expr(
                mentor::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(mentor::Column::SantriId.eq(mentor_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Self::get(db, mentor_id).await
    }

    /// Removes a pentashih and all of their assignments
    pub async fn delete(db: &DatabaseConnection, mentor_id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        mentor_assignment::Entity::delete_many()
            .filter(mentor_assignment::Column::MentorId.eq(mentor_id))
            .exec(&txn)
            .await?;
        let result = mentor::Entity::delete_by_id(mentor_id).exec(&txn).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("pentashih"));
        }

        txn.commit().await?;
        info!("Deleted pentashih {mentor_id}");
        Ok(())
    }

    async fn ensure_mentor<C>(conn: &C, mentor_id: i32) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        mentor::Entity::find_by_id(mentor_id)
            .one(conn)
            .await?
            .map(|_| ())
            .ok_or(ServiceError::NotFound("pentashih"))
    }

    /// `(mentor_id, mentee)` pairs ordered by mentee name
    async fn assignments<C>(
        conn: &C,
        mentor_id: Option<i32>,
    ) -> Result<Vec<(i32, Mentee)>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = mentor_assignment::Entity::find()
            .find_also_related(santri::Entity)
            .order_by_asc(santri::Column::Fullname);
        if let Some(mentor_id) = mentor_id {
            query = query.filter(mentor_assignment::Column::MentorId.eq(mentor_id));
        }

        Ok(query
            .all(conn)
            .await?
            .into_iter()
            .filter_map(|(assignment, santri)| Some((assignment.mentor_id, santri?.into())))
            .collect())
    }

    /// Brings the stored assignments of `mentor_id` in line with `desired`
    async fn reconcile<C>(conn: &C, mentor_id: i32, desired: &[i32]) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let current: Vec<i32> = mentor_assignment::Entity::find()
            .select_only()
            .column(mentor_assignment::Column::SantriId)
            .filter(mentor_assignment::Column::MentorId.eq(mentor_id))
            .into_tuple()
            .all(conn)
            .await?;

        let delta = membership::diff(&current, desired);
        if delta.is_empty() {
            return Ok(());
        }

        if !delta.removed.is_empty() {
            mentor_assignment::Entity::delete_many()
                .filter(mentor_assignment::Column::MentorId.eq(mentor_id))
                .filter(mentor_assignment::Column::SantriId.is_in(delta.removed.iter().copied()))
                .exec(conn)
                .await?;
        }

        if !delta.added.is_empty() {
            let now = Utc::now().naive_utc();
            let rows = delta
                .added
                .iter()
                .map(|&santri_id| mentor_assignment::ActiveModel {
                    mentor_id: Set(mentor_id),
                    santri_id: Set(santri_id),
                    created_at: Set(now),
                    ..Default::default()
                });

            mentor_assignment::Entity::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }

        info!(
            "Pentashih {mentor_id}: assigned {:?}, unassigned {:?}",
            delta.added, delta.removed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::santri::{SantriProfile, SantriRecord, SantriService},
        test_util::TestDb,
    };
    use models::{Role, Status};

    async fn add_santri(db: &DatabaseConnection, code: &str, fullname: &str) -> i32 {
        let record = SantriRecord {
            code: Some(code.to_string()),
            fullname: fullname.to_string(),
            nickname: None,
            gender: Some(Gender::Male),
            role: Role::Santri,
            status: Status::Active,
            profile: SantriProfile::default(),
        };
        SantriService::upsert_by_code(db, record).await.unwrap();
        SantriService::get_by_code(db, code).await.unwrap().id
    }

    fn ids(mentees: &[Mentee]) -> Vec<i32> {
        let mut ids: Vec<_> = mentees.iter().map(|mentee| mentee.id).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_create_without_mentees() {
        let db = TestDb::new().await;
        let umar = add_santri(&db.conn, "U2301", "Umar").await;

        let created = PentashihService::create(&db.conn, umar, &[]).await.unwrap();

        assert_eq!(created.id, umar);
        assert_eq!(created.name, "Umar");
        assert!(created.santri_list.is_empty());
        assert_eq!(PentashihService::list(&db.conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let db = TestDb::new().await;
        let umar = add_santri(&db.conn, "U2301", "Umar").await;

        PentashihService::create(&db.conn, umar, &[]).await.unwrap();

        assert!(matches!(
            PentashihService::create(&db.conn, umar, &[]).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            PentashihService::create(&db.conn, umar + 50, &[]).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_mentees_applies_delta() {
        let db = TestDb::new().await;
        let umar = add_santri(&db.conn, "U2301", "Umar").await;
        let ahmad = add_santri(&db.conn, "A2501", "Ahmad").await;
        let budi = add_santri(&db.conn, "B2501", "Budi").await;
        let citra = add_santri(&db.conn, "C2501", "Citra").await;

        let created = PentashihService::create(&db.conn, umar, &[ahmad, budi])
            .await
            .unwrap();
        let names: Vec<_> = created.santri_list.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Ahmad", "Budi"]);

        let kept_assignment = mentor_assignment::Entity::find()
            .filter(mentor_assignment::Column::SantriId.eq(budi))
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();

        let updated = PentashihService::replace_mentees(&db.conn, umar, &[budi, citra, citra])
            .await
            .unwrap();
        assert_eq!(ids(&updated.santri_list), [budi, citra]);

        // Unchanged pairs are not rewritten
        let still_there = mentor_assignment::Entity::find_by_id(kept_assignment.id)
            .one(&db.conn)
            .await
            .unwrap();
        assert!(still_there.is_some());

        let mentees = PentashihService::mentees(&db.conn, umar).await.unwrap();
        assert_eq!(mentees.len(), 2);
    }

    #[tokio::test]
    async fn test_replace_rolls_back_on_unknown_santri() {
        let db = TestDb::new().await;
        let umar = add_santri(&db.conn, "U2301", "Umar").await;
        let ahmad = add_santri(&db.conn, "A2501", "Ahmad").await;
        PentashihService::create(&db.conn, umar, &[ahmad]).await.unwrap();

        let result = PentashihService::replace_mentees(&db.conn, umar, &[999]).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let mentees = PentashihService::mentees(&db.conn, umar).await.unwrap();
        assert_eq!(ids(&mentees), [ahmad]);
    }

    #[tokio::test]
    async fn test_delete_removes_assignments() {
        let db = TestDb::new().await;
        let umar = add_santri(&db.conn, "U2301", "Umar").await;
        let ahmad = add_santri(&db.conn, "A2501", "Ahmad").await;
        PentashihService::create(&db.conn, umar, &[ahmad]).await.unwrap();

        PentashihService::delete(&db.conn, umar).await.unwrap();

        assert!(PentashihService::list(&db.conn).await.unwrap().is_empty());
        assert_eq!(
            mentor_assignment::Entity::find().all(&db.conn).await.unwrap().len(),
            0
        );
        assert!(matches!(
            PentashihService::delete(&db.conn, umar).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            PentashihService::replace_mentees(&db.conn, umar, &[ahmad]).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
