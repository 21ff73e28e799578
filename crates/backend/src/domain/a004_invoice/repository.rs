use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_client::aggregate::ClientId;
use contracts::domain::a002_visa_application::aggregate::VisaApplicationId;
use contracts::domain::a004_invoice::aggregate::{Invoice, InvoiceId, InvoiceLine, InvoiceStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_invoice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub client_id: i64,
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: Option<String>,
    pub subtotal: f64,
    pub discount: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub currency: String,
    pub status: String,
    pub notes: Option<String>,
    pub sent_date: Option<String>,
    pub paid_date: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Invoice line rows: one attached visa application with its captured price
pub mod line {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a004_invoice_line")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub invoice_id: i64,
        pub visa_application_id: i64,
        pub unit_price: f64,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<Model> for Invoice {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Invoice {
            base: BaseAggregate::with_metadata(
                InvoiceId::new(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            client_id: ClientId::new(m.client_id),
            invoice_number: m.invoice_number,
            invoice_date: m.invoice_date,
            due_date: m.due_date,
            subtotal: m.subtotal,
            discount: m.discount,
            tax_rate: m.tax_rate,
            tax_amount: m.tax_amount,
            total_amount: m.total_amount,
            currency: m.currency,
            status: InvoiceStatus::from_str(&m.status),
            notes: m.notes,
            sent_date: m.sent_date,
            paid_date: m.paid_date,
        }
    }
}

fn to_active_model(invoice: &Invoice) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(invoice.base.code.clone()),
        description: Set(invoice.base.description.clone()),
        comment: Set(invoice.base.comment.clone()),
        client_id: Set(invoice.client_id.value()),
        invoice_number: Set(invoice.invoice_number.clone()),
        invoice_date: Set(invoice.invoice_date.clone()),
        due_date: Set(invoice.due_date.clone()),
        subtotal: Set(invoice.subtotal),
        discount: Set(invoice.discount),
        tax_rate: Set(invoice.tax_rate),
        tax_amount: Set(invoice.tax_amount),
        total_amount: Set(invoice.total_amount),
        currency: Set(invoice.currency.clone()),
        status: Set(invoice.status.as_str().to_string()),
        notes: Set(invoice.notes.clone()),
        sent_date: Set(invoice.sent_date.clone()),
        paid_date: Set(invoice.paid_date.clone()),
        is_deleted: Set(invoice.base.metadata.is_deleted),
        created_at: Set(Some(invoice.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(invoice.base.metadata.version),
    }
}

pub async fn get_by_id(id: i64) -> Result<Option<Invoice>> {
    let db = get_connection();
    let model = Entity::find_by_id(id)
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Invoice>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::InvoiceDate)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Highest invoice number for a year, used for sequence generation.
/// The sequence tail is compared numerically; text ordering would put
/// INV-2025-10000 below INV-2025-9999.
pub async fn last_invoice_number(year: i32) -> Result<Option<String>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::InvoiceNumber.starts_with(&format!("INV-{}-", year)))
        .all(db)
        .await?;
    Ok(latest_by_sequence(
        models.into_iter().map(|m| m.invoice_number),
    ))
}

fn latest_by_sequence(numbers: impl Iterator<Item = String>) -> Option<String> {
    numbers.max_by_key(|number| {
        number
            .rsplit('-')
            .next()
            .and_then(|tail| tail.parse::<u64>().ok())
            .unwrap_or(0)
    })
}

pub async fn insert(invoice: &Invoice) -> Result<i64> {
    let db = get_connection();
    let am = to_active_model(invoice);
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

pub async fn update(invoice: &Invoice) -> Result<()> {
    let db = get_connection();
    let mut am = to_active_model(invoice);
    am.id = Set(invoice.base.id.value());
    am.version = Set(invoice.base.metadata.version + 1);
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

// ---------------------------------------------------------------------------
// Invoice lines

pub async fn list_lines(invoice_id: i64) -> Result<Vec<InvoiceLine>> {
    let db = get_connection();
    let models = line::Entity::find()
        .filter(line::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(line::Column::Id)
        .all(db)
        .await?;
    Ok(models
        .into_iter()
        .map(|m| InvoiceLine {
            visa_application_id: VisaApplicationId::new(m.visa_application_id),
            unit_price: m.unit_price,
        })
        .collect())
}

pub async fn line_exists(invoice_id: i64, visa_application_id: i64) -> Result<bool> {
    let db = get_connection();
    let count = line::Entity::find()
        .filter(line::Column::InvoiceId.eq(invoice_id))
        .filter(line::Column::VisaApplicationId.eq(visa_application_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn insert_line(invoice_id: i64, visa_application_id: i64, unit_price: f64) -> Result<()> {
    let db = get_connection();
    let am = line::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        invoice_id: Set(invoice_id),
        visa_application_id: Set(visa_application_id),
        unit_price: Set(unit_price),
        created_at: Set(Some(Utc::now())),
    };
    line::Entity::insert(am).exec(db).await?;
    Ok(())
}

pub async fn delete_line(invoice_id: i64, visa_application_id: i64) -> Result<()> {
    let db = get_connection();
    line::Entity::delete_many()
        .filter(line::Column::InvoiceId.eq(invoice_id))
        .filter(line::Column::VisaApplicationId.eq(visa_application_id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete_all_lines(invoice_id: i64) -> Result<()> {
    let db = get_connection();
    line::Entity::delete_many()
        .filter(line::Column::InvoiceId.eq(invoice_id))
        .exec(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::latest_by_sequence;

    fn latest(numbers: &[&str]) -> Option<String> {
        latest_by_sequence(numbers.iter().map(|n| n.to_string()))
    }

    #[test]
    fn picks_highest_sequence_numerically() {
        assert_eq!(
            latest(&["INV-2025-0001", "INV-2025-0003", "INV-2025-0002"]),
            Some("INV-2025-0003".to_string())
        );
    }

    #[test]
    fn five_digit_sequence_beats_four_digit() {
        assert_eq!(
            latest(&["INV-2025-9999", "INV-2025-10000"]),
            Some("INV-2025-10000".to_string())
        );
    }

    #[test]
    fn empty_set_has_no_latest() {
        assert_eq!(latest(&[]), None);
    }
}
