use crate::{
    entities::{mentor_assignment, santri},
    error::ServiceError,
};
use chrono::{Datelike, NaiveDate, Utc};
use log::info;
use models::{Gender, Role, Status, student_code};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, OnConflict, Query},
};
use serde::Deserialize;

/// Optional profile fields shared by every way of writing a santri record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SantriProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub incoming_year: Option<String>,
    pub college_year: Option<String>,
    pub high_school: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub full_address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

impl SantriProfile {
    /// Overwrites every profile column, including clearing absent ones
    fn replace_into(self, active: &mut santri::ActiveModel) {
        active.email = Set(self.email);
        active.phone = Set(self.phone);
        active.incoming_year = Set(self.incoming_year);
        active.college_year = Set(self.college_year);
        active.high_school = Set(self.high_school);
        active.university = Set(self.university);
        active.faculty = Set(self.faculty);
        active.major = Set(self.major);
        active.birth_place = Set(self.birth_place);
        active.birth_date = Set(self.birth_date);
        active.full_address = Set(self.full_address);
        active.village = Set(self.village);
        active.district = Set(self.district);
        active.city = Set(self.city);
        active.province = Set(self.province);
    }

    /// Overwrites only the profile columns present in `self`
    fn merge_into(self, active: &mut santri::ActiveModel) {
        fn merge<T>(slot: &mut sea_orm::ActiveValue<Option<T>>, value: Option<T>)
        where
            Option<T>: Into<sea_orm::Value>,
        {
            if let Some(value) = value {
                *slot = Set(Some(value));
            }
        }

        merge(&mut active.email, self.email);
        merge(&mut active.phone, self.phone);
        merge(&mut active.incoming_year, self.incoming_year);
        merge(&mut active.college_year, self.college_year);
        merge(&mut active.high_school, self.high_school);
        merge(&mut active.university, self.university);
        merge(&mut active.faculty, self.faculty);
        merge(&mut active.major, self.major);
        merge(&mut active.birth_place, self.birth_place);
        merge(&mut active.birth_date, self.birth_date);
        merge(&mut active.full_address, self.full_address);
        merge(&mut active.village, self.village);
        merge(&mut active.district, self.district);
        merge(&mut active.city, self.city);
        merge(&mut active.province, self.province);
    }
}

/// Request to register a new santri
#[derive(Debug, Clone, Deserialize)]
pub struct NewSantri {
    #[serde(default)]
    pub code: Option<String>,
    pub fullname: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub gender: Gender,
    pub role: Role,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(flatten)]
    pub profile: SantriProfile,
}

/// Partial update of a santri; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SantriPatch {
    pub code: Option<String>,
    pub fullname: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<Role>,
    pub status: Option<Status>,
    #[serde(flatten)]
    pub profile: SantriProfile,
}

/// A fully normalized record coming from a bulk source
#[derive(Debug, Clone, PartialEq)]
pub struct SantriRecord {
    pub code: Option<String>,
    pub fullname: String,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub role: Role,
    pub status: Status,
    pub profile: SantriProfile,
}

/// Filters for listing santri
#[derive(Debug, Clone, Default)]
pub struct SantriFilter {
    pub gender: Option<Gender>,
    pub status: Option<Status>,
    pub role: Option<Role>,
    /// `Some(true)` keeps santri with a pentashih, `Some(false)` those without
    pub assigned: Option<bool>,
}

pub struct SantriService;

impl SantriService {
    /// Upper bound on the page size accepted by [`SantriService::list`]
    pub const MAX_PER_PAGE: u64 = 100;

    /// List santri with filtering and pagination, newest first
    ///
    /// # Returns
    /// The requested page and the total number of matching records
    pub async fn list(
        db: &DatabaseConnection,
        filter: &SantriFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<santri::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::validation("page starts at 1"));
        }
        if per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(ServiceError::validation(format!(
                "per_page must be between 1 and {}",
                Self::MAX_PER_PAGE
            )));
        }

        let query = santri::Entity::find()
            .filter(Self::build_condition(filter))
            .order_by_desc(santri::Column::CreatedAt)
            .order_by_desc(santri::Column::Id);

        let paginator = query.paginate(db, per_page);
        let total_items = paginator.num_items().await?;
        let santri = paginator.fetch_page(page - 1).await?; // SeaORM uses 0-based pages

        Ok((santri, total_items))
    }

    fn build_condition(filter: &SantriFilter) -> Condition {
        let assigned_ids = Query::select()
            .column(mentor_assignment::Column::SantriId)
            .from(mentor_assignment::Entity)
            .to_owned();

        Condition::all()
            .add_option(filter.gender.map(|gender| santri::Column::Gender.eq(gender)))
            .add_option(filter.status.map(|status| santri::Column::Status.eq(status)))
            .add_option(filter.role.map(|role| santri::Column::Role.eq(role)))
            .add_option(filter.assigned.map(|assigned| {
                if assigned {
                    santri::Column::Id.in_subquery(assigned_ids)
                } else {
                    santri::Column::Id.not_in_subquery(assigned_ids)
                }
            }))
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<santri::Model, ServiceError> {
        santri::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("santri"))
    }

    pub async fn get_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<santri::Model, ServiceError> {
        santri::Entity::find()
            .filter(santri::Column::Code.eq(code))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("santri"))
    }

    /// Registers a new santri, generating a code when none is given
    pub async fn create(
        db: &DatabaseConnection,
        new: NewSantri,
    ) -> Result<santri::Model, ServiceError> {
        let fullname = new.fullname.trim().to_owned();
        if fullname.is_empty() {
            return Err(ServiceError::validation("fullname is required"));
        }

        let now = Utc::now().naive_utc();
        let code = match new.code.filter(|code| !code.trim().is_empty()) {
            Some(code) => code.trim().to_owned(),
            None => Self::generate_code(db, &fullname, now.year()).await?,
        };

        // Default the nickname to the first word of the full name
        let nickname = new
            .nickname
            .filter(|nickname| !nickname.trim().is_empty())
            .or_else(|| fullname.split_whitespace().next().map(str::to_owned));

        let mut profile = new.profile;
        if profile.incoming_year.is_none() {
            profile.incoming_year = Some(now.year().to_string());
        }

        let mut active = santri::ActiveModel {
            id: NotSet,
            code: Set(Some(code)),
            fullname: Set(fullname),
            nickname: Set(nickname),
            gender: Set(Some(new.gender)),
            role: Set(new.role),
            status: Set(new.status.unwrap_or(Status::Active)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        profile.replace_into(&mut active);

        let model = active.insert(db).await?;
        info!("Created santri {} ({:?})", model.id, model.code);

        Ok(model)
    }

    /// Applies a partial update to an existing santri
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        patch: SantriPatch,
    ) -> Result<santri::Model, ServiceError> {
        if patch
            .fullname
            .as_deref()
            .is_some_and(|fullname| fullname.trim().is_empty())
        {
            return Err(ServiceError::validation("fullname must not be empty"));
        }

        let existing = Self::get(db, id).await?;
        let mut active: santri::ActiveModel = existing.into();

        if let Some(code) = patch.code.filter(|code| !code.trim().is_empty()) {
            active.code = Set(Some(code.trim().to_owned()));
        }
        if let Some(fullname) = patch.fullname {
            active.fullname = Set(fullname.trim().to_owned());
        }
        if let Some(nickname) = patch.nickname {
            active.nickname = Set(Some(nickname));
        }
        if let Some(gender) = patch.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(role) = patch.role {
            active.role = Set(role);
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        patch.profile.merge_into(&mut active);
        active.updated_at = Set(Utc::now().naive_utc());

        Ok(active.update(db).await?)
    }

    pub async fn update_role(
        db: &DatabaseConnection,
        id: i32,
        role: Role,
    ) -> Result<santri::Model, ServiceError> {
        let patch = SantriPatch {
            role: Some(role),
            ..Default::default()
        };

        Self::update(db, id, patch).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = santri::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("santri"));
        }

        info!("Deleted santri {id}");
        Ok(())
    }

    /// Case-insensitive substring search over full name and nickname
    pub async fn search(
        db: &DatabaseConnection,
        term: &str,
    ) -> Result<Vec<santri::Model>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::validation("search query is required"));
        }

        let pattern = format!("%{}%", term.to_lowercase());
        let condition = Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(santri::Column::Fullname))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(Expr::col(santri::Column::Nickname))).like(pattern));

        Ok(santri::Entity::find()
            .filter(condition)
            .order_by_asc(santri::Column::Fullname)
            .all(db)
            .await?)
    }

    /// Inserts a record or, when its code already exists, overwrites the
    /// stored row except for `id`, `code` and `created_at`
    ///
    /// Takes any connection so callers can run it inside a transaction or
    /// savepoint.
    pub async fn upsert_by_code<C>(conn: &C, record: SantriRecord) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().naive_utc();

        let mut active = santri::ActiveModel {
            id: NotSet,
            code: Set(record.code),
            fullname: Set(record.fullname),
            nickname: Set(record.nickname),
            gender: Set(record.gender),
            role: Set(record.role),
            status: Set(record.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        record.profile.replace_into(&mut active);

        santri::Entity::insert(active)
            .on_conflict(
                OnConflict::column(santri::Column::Code)
                    .update_columns([
                        santri::Column::Fullname,
                        santri::Column::Nickname,
                        santri::Column::Gender,
                        santri::Column::Role,
                        santri::Column::Status,
                        santri::Column::Email,
                        santri::Column::Phone,
                        santri::Column::IncomingYear,
                        santri::Column::CollegeYear,
                        santri::Column::HighSchool,
                        santri::Column::University,
                        santri::Column::Faculty,
                        santri::Column::Major,
                        santri::Column::BirthPlace,
                        santri::Column::BirthDate,
                        santri::Column::FullAddress,
                        santri::Column::Village,
                        santri::Column::District,
                        santri::Column::City,
                        santri::Column::Province,
                        santri::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }

    /// Next free `[Initial][YY][NN]` code for a santri named `fullname`
    async fn generate_code(
        db: &DatabaseConnection,
        fullname: &str,
        year: i32,
    ) -> Result<String, ServiceError> {
        let prefix = student_code::code_prefix(fullname, year)
            .ok_or_else(|| ServiceError::validation("fullname is required"))?;

        let existing: Vec<String> = santri::Entity::find()
            .select_only()
            .column(santri::Column::Code)
            .filter(santri::Column::Code.starts_with(&prefix))
            .into_tuple()
            .all(db)
            .await?;

        Ok(student_code::next_code(
            &prefix,
            existing.iter().map(String::as_str),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::TestDb;

    fn new_santri(fullname: &str, gender: Gender) -> NewSantri {
        NewSantri {
            code: None,
            fullname: fullname.to_string(),
            nickname: None,
            gender,
            role: Role::Santri,
            status: None,
            profile: SantriProfile::default(),
        }
    }

    fn record(code: &str, fullname: &str) -> SantriRecord {
        SantriRecord {
            code: Some(code.to_string()),
            fullname: fullname.to_string(),
            nickname: None,
            gender: Some(Gender::Male),
            role: Role::Santri,
            status: Status::Inactive,
            profile: SantriProfile::default(),
        }
    }

    #[tokio::test]
    async fn test_create_generates_sequential_codes() {
        let db = TestDb::new().await;
        let yy = Utc::now().year() % 100;

        let first = SantriService::create(&db.conn, new_santri("ahmad fajar", Gender::Male))
            .await
            .unwrap();
        let second = SantriService::create(&db.conn, new_santri("Aisyah", Gender::Female))
            .await
            .unwrap();

        assert_eq!(first.code, Some(format!("A{yy:02}01")));
        assert_eq!(second.code, Some(format!("A{yy:02}02")));
        assert_eq!(first.nickname.as_deref(), Some("ahmad"));
        assert_eq!(first.status, Status::Active);
        assert_eq!(first.incoming_year, Some(Utc::now().year().to_string()));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = TestDb::new().await;

        let result = SantriService::create(&db.conn, new_santri("   ", Gender::Male)).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_code_conflicts() {
        let db = TestDb::new().await;
        let mut santri = new_santri("Budi", Gender::Male);
        santri.code = Some("B2501".to_string());

        SantriService::create(&db.conn, santri.clone()).await.unwrap();
        let result = SantriService::create(&db.conn, santri).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let db = TestDb::new().await;
        let mut santri = new_santri("Citra Lestari", Gender::Female);
        santri.profile.city = Some("Bandung".to_string());
        let created = SantriService::create(&db.conn, santri).await.unwrap();

        let patch = SantriPatch {
            status: Some(Status::Inactive),
            profile: SantriProfile {
                major: Some("Informatika".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let updated = SantriService::update(&db.conn, created.id, patch)
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Inactive);
        assert_eq!(updated.major.as_deref(), Some("Informatika"));
        assert_eq!(updated.city.as_deref(), Some("Bandung"));
        assert_eq!(updated.fullname, "Citra Lestari");
        assert_eq!(updated.code, created.code);
    }

    #[tokio::test]
    async fn test_update_role_and_missing_santri() {
        let db = TestDb::new().await;
        let created = SantriService::create(&db.conn, new_santri("Dewi", Gender::Female))
            .await
            .unwrap();

        let updated = SantriService::update_role(&db.conn, created.id, Role::Pentashih)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Pentashih);

        let missing = SantriService::update_role(&db.conn, created.id + 100, Role::Santri).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let db = TestDb::new().await;
        for name in ["Eka", "Fajar", "Gilang"] {
            SantriService::create(&db.conn, new_santri(name, Gender::Male))
                .await
                .unwrap();
        }
        SantriService::create(&db.conn, new_santri("Hana", Gender::Female))
            .await
            .unwrap();

        let filter = SantriFilter {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        let (page, total) = SantriService::list(&db.conn, &filter, 1, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        // Newest first
        assert_eq!(page[0].fullname, "Gilang");

        let (last, _) = SantriService::list(&db.conn, &filter, 2, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].fullname, "Eka");

        let invalid = SantriService::list(&db.conn, &filter, 0, 2).await;
        assert!(matches!(invalid, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let db = TestDb::new().await;
        let mut santri = new_santri("Muhammad Rizki", Gender::Male);
        santri.nickname = Some("Kiki".to_string());
        SantriService::create(&db.conn, santri).await.unwrap();
        SantriService::create(&db.conn, new_santri("Nadia", Gender::Female))
            .await
            .unwrap();

        let by_name = SantriService::search(&db.conn, "RIZ").await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_nickname = SantriService::search(&db.conn, "kik").await.unwrap();
        assert_eq!(by_nickname[0].fullname, "Muhammad Rizki");

        assert!(SantriService::search(&db.conn, "zzz").await.unwrap().is_empty());
        assert!(SantriService::search(&db.conn, " ").await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_by_code_overwrites_existing() {
        let db = TestDb::new().await;

        SantriService::upsert_by_code(&db.conn, record("A2501", "Ahmad"))
            .await
            .unwrap();
        let original = SantriService::get_by_code(&db.conn, "A2501").await.unwrap();

        let mut changed = record("A2501", "Ahmad Fajar");
        changed.status = Status::Active;
        SantriService::upsert_by_code(&db.conn, changed).await.unwrap();

        let stored = SantriService::get_by_code(&db.conn, "A2501").await.unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.fullname, "Ahmad Fajar");
        assert_eq!(stored.status, Status::Active);
        assert_eq!(stored.created_at, original.created_at);

        let count = santri::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = TestDb::new().await;
        let created = SantriService::create(&db.conn, new_santri("Indra", Gender::Male))
            .await
            .unwrap();

        SantriService::delete(&db.conn, created.id).await.unwrap();

        assert!(matches!(
            SantriService::get(&db.conn, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(SantriService::delete(&db.conn, created.id).await.is_err());
    }
}
