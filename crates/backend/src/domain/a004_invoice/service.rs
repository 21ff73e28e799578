use super::repository;
use crate::domain::{a001_client, a002_visa_application, a003_pricing};
use crate::shared::error::ServiceError;
use chrono::{Datelike, Utc};
use contracts::domain::a001_client::aggregate::ClientId;
use contracts::domain::a004_invoice::aggregate::{
    Invoice, InvoiceDto, InvoiceId, InvoiceLine, InvoiceStatus,
};
use contracts::domain::common::BaseAggregate;
use contracts::picker::{AvailableItemsResponse, LineItem, SelectedItemsResponse};
use std::collections::{HashMap, HashSet};

pub async fn get_by_id(id: i64) -> Result<Invoice, ServiceError> {
    repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Invoice"))
}

pub async fn list_all() -> Result<Vec<Invoice>, ServiceError> {
    Ok(repository::list_all().await?)
}

/// Attached applications of an invoice rendered as picker line items,
/// with the unit price captured at attach time.
pub async fn selected_items(invoice: &Invoice) -> Result<Vec<LineItem>, ServiceError> {
    let lines = repository::list_lines(invoice.base.id.value()).await?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let app = a002_visa_application::service::get_by_id(line.visa_application_id.value())
            .await?;
        items.push(LineItem::new(
            line.visa_application_id.value(),
            app.display_label(),
            line.unit_price,
            Some(invoice.currency.clone()),
        ));
    }
    Ok(items)
}

/// Applications of a client that can still be attached. When `invoice_id`
/// is given, applications already on that invoice are excluded.
pub async fn available_items(
    client_id: i64,
    invoice_id: Option<i64>,
) -> Result<AvailableItemsResponse, ServiceError> {
    a001_client::service::get_by_id(client_id).await?;

    let attached: HashSet<i64> = match invoice_id {
        Some(id) => {
            // The invoice must exist, but a freshly created one has no lines
            get_by_id(id).await?;
            repository::list_lines(id)
                .await?
                .into_iter()
                .map(|l| l.visa_application_id.value())
                .collect()
        }
        None => HashSet::new(),
    };

    let apps = a002_visa_application::service::list_by_client(client_id).await?;
    let mut items = Vec::new();
    for app in apps {
        if attached.contains(&app.base.id.value()) {
            continue;
        }
        let (price, currency) = a003_pricing::service::price_for_visa_type(app.visa_type).await?;
        items.push(LineItem::new(
            app.base.id.value(),
            app.display_label(),
            price,
            Some(currency),
        ));
    }

    Ok(AvailableItemsResponse {
        client_id,
        available_items: items,
    })
}

/// Attach an application to an invoice, capturing the current price, and
/// return the authoritative selection snapshot.
pub async fn add_item(
    invoice_id: i64,
    visa_application_id: i64,
) -> Result<SelectedItemsResponse, ServiceError> {
    let mut invoice = get_by_id(invoice_id).await?;
    let app = a002_visa_application::service::get_by_id(visa_application_id).await?;

    if app.client_id != invoice.client_id {
        return Err(ServiceError::Validation(
            "Application belongs to a different client".to_string(),
        ));
    }
    if repository::line_exists(invoice_id, visa_application_id).await? {
        return Err(ServiceError::Validation(
            "Application is already attached to this invoice".to_string(),
        ));
    }

    let (price, _) = a003_pricing::service::price_for_visa_type(app.visa_type).await?;
    repository::insert_line(invoice_id, visa_application_id, price).await?;

    refresh_totals(&mut invoice).await?;
    selection_snapshot(&invoice).await
}

/// Detach an application from an invoice. Detaching an application that is
/// not attached is a no-op that still returns the current snapshot.
pub async fn remove_item(
    invoice_id: i64,
    visa_application_id: i64,
) -> Result<SelectedItemsResponse, ServiceError> {
    let mut invoice = get_by_id(invoice_id).await?;
    repository::delete_line(invoice_id, visa_application_id).await?;

    refresh_totals(&mut invoice).await?;
    selection_snapshot(&invoice).await
}

pub async fn create(dto: InvoiceDto) -> Result<i64, ServiceError> {
    a001_client::service::get_by_id(dto.client_id).await?;

    let today = Utc::now().date_naive();
    let last = repository::last_invoice_number(today.year()).await?;
    let number = Invoice::next_number(today.year(), last.as_deref());

    let mut invoice = Invoice {
        base: BaseAggregate::new(InvoiceId::new(0), number.clone(), String::new()),
        client_id: ClientId::new(dto.client_id),
        invoice_number: number,
        invoice_date: today.format("%Y-%m-%d").to_string(),
        due_date: dto.due_date.clone(),
        subtotal: 0.0,
        discount: dto.discount.unwrap_or(0.0),
        tax_rate: dto.tax_rate.unwrap_or(0.0),
        tax_amount: 0.0,
        total_amount: 0.0,
        currency: contracts::domain::a003_pricing::aggregate::DEFAULT_CURRENCY.to_string(),
        status: dto
            .status
            .as_deref()
            .map(InvoiceStatus::from_str)
            .unwrap_or(InvoiceStatus::Draft),
        notes: dto.notes.clone(),
        sent_date: None,
        paid_date: None,
    };
    validate_amounts(&invoice)?;

    let lines = price_payload_items(dto.client_id, &dto.items, &HashMap::new()).await?;
    invoice.apply_lines(&lines);
    invoice.base.description = invoice.invoice_number.clone();

    let id = repository::insert(&invoice).await?;
    for line in &lines {
        repository::insert_line(id, line.visa_application_id.value(), line.unit_price).await?;
    }
    Ok(id)
}

pub async fn update(dto: InvoiceDto) -> Result<(), ServiceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid invoice id".to_string()))?;

    let mut invoice = get_by_id(id).await?;

    // A confirmed owner change arrives as a plain client_id update; the
    // submitted selection then belongs to the new client and replaces the
    // old client's lines entirely.
    if dto.client_id != invoice.client_id.value() {
        a001_client::service::get_by_id(dto.client_id).await?;
        invoice.client_id = ClientId::new(dto.client_id);
    }

    invoice.due_date = dto.due_date;
    invoice.discount = dto.discount.unwrap_or(invoice.discount);
    invoice.tax_rate = dto.tax_rate.unwrap_or(invoice.tax_rate);
    if let Some(status) = dto.status.as_deref() {
        set_status(&mut invoice, InvoiceStatus::from_str(status));
    }
    invoice.notes = dto.notes;
    validate_amounts(&invoice)?;

    // The submitted selection replaces the attached lines wholesale.
    // Lines that survive the edit keep the price captured when they were
    // attached; only newly attached applications are priced.
    let existing: HashMap<i64, f64> = repository::list_lines(id)
        .await?
        .into_iter()
        .map(|l| (l.visa_application_id.value(), l.unit_price))
        .collect();
    let lines = price_payload_items(invoice.client_id.value(), &dto.items, &existing).await?;
    repository::delete_all_lines(id).await?;
    for line in &lines {
        repository::insert_line(id, line.visa_application_id.value(), line.unit_price).await?;
    }

    invoice.apply_lines(&lines);
    invoice.base.touch();
    repository::update(&invoice).await?;
    Ok(())
}

pub async fn delete(id: i64) -> Result<bool, ServiceError> {
    let deleted = repository::soft_delete(id).await?;
    if deleted {
        repository::delete_all_lines(id).await?;
    }
    Ok(deleted)
}

/// Recompute invoice amounts from its current lines and persist them.
async fn refresh_totals(invoice: &mut Invoice) -> Result<(), ServiceError> {
    let lines = repository::list_lines(invoice.base.id.value()).await?;
    invoice.apply_lines(&lines);
    invoice.base.touch();
    repository::update(invoice).await?;
    Ok(())
}

async fn selection_snapshot(invoice: &Invoice) -> Result<SelectedItemsResponse, ServiceError> {
    Ok(SelectedItemsResponse {
        selected_items: selected_items(invoice).await?,
        subtotal: invoice.subtotal,
        total: invoice.total_amount,
    })
}

/// Turn a submitted picker payload into priced lines. Client-side prices
/// are ignored: already-attached items keep their captured price from
/// `existing`, new items are priced from the current pricing table.
async fn price_payload_items(
    client_id: i64,
    items: &[LineItem],
    existing: &HashMap<i64, f64>,
) -> Result<Vec<InvoiceLine>, ServiceError> {
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            continue;
        }
        let app = a002_visa_application::service::get_by_id(item.id).await?;
        if app.client_id.value() != client_id {
            return Err(ServiceError::Validation(
                "Application belongs to a different client".to_string(),
            ));
        }
        let price = match existing.get(&item.id) {
            Some(captured) => *captured,
            None => {
                a003_pricing::service::price_for_visa_type(app.visa_type)
                    .await?
                    .0
            }
        };
        lines.push(InvoiceLine {
            visa_application_id: app.base.id,
            unit_price: price,
        });
    }
    Ok(lines)
}

fn validate_amounts(invoice: &Invoice) -> Result<(), ServiceError> {
    if invoice.discount < 0.0 {
        return Err(ServiceError::Validation(
            "Discount cannot be negative".to_string(),
        ));
    }
    if invoice.tax_rate < 0.0 || invoice.tax_rate > 100.0 {
        return Err(ServiceError::Validation(
            "Tax rate must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Status transitions stamp the sent/paid dates the first time they happen.
fn set_status(invoice: &mut Invoice, status: InvoiceStatus) {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    if status == InvoiceStatus::Sent && invoice.sent_date.is_none() {
        invoice.sent_date = Some(today.clone());
    }
    if status == InvoiceStatus::Paid && invoice.paid_date.is_none() {
        invoice.paid_date = Some(today);
    }
    invoice.status = status;
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_client::aggregate::ClientDto;
    use contracts::domain::a002_visa_application::aggregate::VisaApplicationDto;
    use contracts::domain::a003_pricing::aggregate::PricingDto;

    // All tests share one connection through the process-wide pool, so each
    // test creates its own clients and applications.
    async fn setup_db() {
        let path = std::env::temp_dir().join(format!(
            "invoice-service-tests-{}.db",
            std::process::id()
        ));
        let _ = crate::shared::data::db::initialize_database(path.to_str()).await;
    }

    async fn make_client(tag: &str) -> i64 {
        a001_client::service::create(ClientDto {
            id: None,
            first_name: "Test".to_string(),
            last_name: tag.to_string(),
            email: format!("{}@example.com", tag),
            phone: "+441234567890".to_string(),
            date_of_birth: None,
            passport_number: format!("P-{}", tag),
            nationality: "British".to_string(),
            country_of_residence: "UK".to_string(),
            preferred_contact_method: None,
            lead_source: None,
            client_status: None,
            visa_type: None,
            notes: None,
        })
        .await
        .unwrap()
    }

    async fn make_application(client_id: i64, visa_type: &str) -> i64 {
        a002_visa_application::service::create(VisaApplicationDto {
            id: None,
            client_id,
            visa_type: visa_type.to_string(),
            stage: None,
            appointment_date: None,
            appointment_location: None,
            decision: None,
            decision_date: None,
            decision_notes: None,
            assigned_agent: None,
            notes: None,
        })
        .await
        .unwrap()
    }

    fn payload_item(visa_application_id: i64) -> LineItem {
        // Label and price come from the client form; the server ignores both
        LineItem::new(visa_application_id, "submitted", 0.0, None)
    }

    fn update_dto(invoice_id: i64, client_id: i64, items: Vec<LineItem>) -> InvoiceDto {
        InvoiceDto {
            id: Some(invoice_id.to_string()),
            client_id,
            due_date: None,
            discount: None,
            tax_rate: None,
            status: None,
            notes: None,
            items,
        }
    }

    #[tokio::test]
    async fn update_reassigns_invoice_to_new_client() {
        setup_db().await;
        let client_a = make_client("owner-change-a").await;
        let client_b = make_client("owner-change-b").await;
        let app_a = make_application(client_a, "uk").await;
        let app_b = make_application(client_b, "nz").await;

        let invoice_id = create(InvoiceDto {
            id: None,
            client_id: client_a,
            due_date: None,
            discount: None,
            tax_rate: None,
            status: None,
            notes: None,
            items: vec![payload_item(app_a)],
        })
        .await
        .unwrap();

        update(update_dto(invoice_id, client_b, vec![payload_item(app_b)]))
            .await
            .unwrap();

        let invoice = get_by_id(invoice_id).await.unwrap();
        assert_eq!(invoice.client_id.value(), client_b);

        let items = selected_items(&invoice).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, app_b);
    }

    #[tokio::test]
    async fn add_item_accepted_after_client_change() {
        setup_db().await;
        let client_a = make_client("add-after-switch-a").await;
        let client_b = make_client("add-after-switch-b").await;
        let app_b1 = make_application(client_b, "uk").await;
        let app_b2 = make_application(client_b, "us").await;

        let invoice_id = create(InvoiceDto {
            id: None,
            client_id: client_a,
            due_date: None,
            discount: None,
            tax_rate: None,
            status: None,
            notes: None,
            items: vec![],
        })
        .await
        .unwrap();

        update(update_dto(invoice_id, client_b, vec![payload_item(app_b1)]))
            .await
            .unwrap();

        let snapshot = add_item(invoice_id, app_b2).await.unwrap();
        let mut ids: Vec<i64> = snapshot.selected_items.iter().map(|i| i.id).collect();
        ids.sort();
        let mut expected = vec![app_b1, app_b2];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn update_rejects_unknown_client() {
        setup_db().await;
        let client = make_client("unknown-target").await;

        let invoice_id = create(InvoiceDto {
            id: None,
            client_id: client,
            due_date: None,
            discount: None,
            tax_rate: None,
            status: None,
            notes: None,
            items: vec![],
        })
        .await
        .unwrap();

        let err = update(update_dto(invoice_id, 999_999, vec![])).await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));

        let invoice = get_by_id(invoice_id).await.unwrap();
        assert_eq!(invoice.client_id.value(), client);
    }

    #[tokio::test]
    async fn attached_lines_keep_their_captured_price_across_saves() {
        setup_db().await;
        let client = make_client("attach-price").await;
        // No pricing row for "au" yet, so attach captures the default price
        let app = make_application(client, "au").await;

        let invoice_id = create(InvoiceDto {
            id: None,
            client_id: client,
            due_date: None,
            discount: None,
            tax_rate: None,
            status: None,
            notes: None,
            items: vec![payload_item(app)],
        })
        .await
        .unwrap();
        let attach_subtotal = get_by_id(invoice_id).await.unwrap().subtotal;

        a003_pricing::service::create(PricingDto {
            id: None,
            visa_type: "au".to_string(),
            amount: attach_subtotal + 50.0,
            currency: None,
            is_active: None,
        })
        .await
        .unwrap();

        // A save with the unchanged selection must not re-price the line
        update(update_dto(invoice_id, client, vec![payload_item(app)]))
            .await
            .unwrap();

        let invoice = get_by_id(invoice_id).await.unwrap();
        assert_eq!(invoice.subtotal, attach_subtotal);

        let items = selected_items(&invoice).await.unwrap();
        assert_eq!(items[0].price, attach_subtotal);
    }
}
