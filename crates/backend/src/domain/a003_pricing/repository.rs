use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_client::aggregate::VisaType;
use contracts::domain::a003_pricing::aggregate::{Pricing, PricingId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_pricing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub visa_type: String,
    pub amount: f64,
    pub currency: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Pricing {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Pricing {
            base: BaseAggregate::with_metadata(
                PricingId::new(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            visa_type: VisaType::from_str(&m.visa_type).unwrap_or(VisaType::Schengen),
            amount: m.amount,
            currency: m.currency,
            is_active: m.is_active,
        }
    }
}

fn to_active_model(pricing: &Pricing) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(pricing.base.code.clone()),
        description: Set(pricing.base.description.clone()),
        comment: Set(pricing.base.comment.clone()),
        visa_type: Set(pricing.visa_type.as_str().to_string()),
        amount: Set(pricing.amount),
        currency: Set(pricing.currency.clone()),
        is_active: Set(pricing.is_active),
        is_deleted: Set(pricing.base.metadata.is_deleted),
        created_at: Set(Some(pricing.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(pricing.base.metadata.version),
    }
}

pub async fn get_by_id(id: i64) -> Result<Option<Pricing>> {
    let db = get_connection();
    let model = Entity::find_by_id(id)
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Pricing>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::VisaType)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn get_active_for_visa_type(visa_type: VisaType) -> Result<Option<Pricing>> {
    let db = get_connection();
    let model = Entity::find()
        .filter(Column::VisaType.eq(visa_type.as_str()))
        .filter(Column::IsActive.eq(true))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn insert(pricing: &Pricing) -> Result<i64> {
    let db = get_connection();
    let am = to_active_model(pricing);
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

pub async fn update(pricing: &Pricing) -> Result<()> {
    let db = get_connection();
    let mut am = to_active_model(pricing);
    am.id = Set(pricing.base.id.value());
    am.version = Set(pricing.base.metadata.version + 1);
    Entity::update(am).exec(db).await?;
    Ok(())
}

pub async fn soft_delete(id: i64) -> Result<bool> {
    let db = get_connection();
    let Some(model) = Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    let mut am: ActiveModel = model.into();
    am.is_deleted = Set(true);
    am.updated_at = Set(Some(Utc::now()));
    Entity::update(am).exec(db).await?;
    Ok(true)
}
