//! Repository implementation for quotations, invoices and invoice payments.
//!
//! Document numbers are allocated inside an immediate transaction so two
//! concurrent writers of the same hub cannot read the same last number.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::{
    domain::{
        billing::{INVOICE_PREFIX, QUOTATION_PREFIX, next_document_number},
        invoice::{
            Invoice, InvoiceDraft, InvoiceStatus, NewInvoice, NewPayment, Payment, Settlement,
        },
        quotation::{NewQuotation, Quotation, QuotationDraft, QuotationStatus},
        types::{HubId, InvoiceId, PaymentId, PublicId, QuotationId},
    },
    models::billing::{
        Invoice as DbInvoice, NewInvoice as DbNewInvoice, NewPayment as DbNewPayment,
        NewQuotation as DbNewQuotation, Payment as DbPayment, Quotation as DbQuotation,
        UpdateInvoice as DbUpdateInvoice, UpdateQuotation as DbUpdateQuotation,
    },
    repository::{
        DieselRepository, InvoiceListQuery, InvoiceReader, InvoiceWriter, LIKE_ESCAPE,
        QuotationListQuery, QuotationReader, QuotationWriter,
        errors::{RepositoryError, RepositoryResult},
        like_pattern,
    },
};

impl QuotationReader for DieselRepository {
    fn get_quotation_by_id(
        &self,
        id: QuotationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Quotation>> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let db_quotation = quotations::table
            .filter(quotations::id.eq(id.get()))
            .filter(quotations::hub_id.eq(hub_id.get()))
            .first::<DbQuotation>(&mut conn)
            .optional()?;

        db_quotation
            .map(Quotation::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_quotations(
        &self,
        query: QuotationListQuery,
    ) -> RepositoryResult<(usize, Vec<Quotation>)> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = quotations::table
                .filter(quotations::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(quotations::status.eq(status.as_str()));
            }
            if let Some(lead_id) = query.lead_id {
                items = items.filter(quotations::lead_id.eq(lead_id.get()));
            }
            if let Some(search) = &query.search {
                let pattern = like_pattern(search);
                items = items.filter(
                    quotations::customer_name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(quotations::number.like(pattern).escape(LIKE_ESCAPE)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(quotations::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let quotations = items
            .load::<DbQuotation>(&mut conn)?
            .into_iter()
            .map(Quotation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, quotations))
    }

    fn list_lapsed_quotations(&self, today: NaiveDate) -> RepositoryResult<Vec<Quotation>> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let open = [QuotationStatus::Draft.as_str(), QuotationStatus::Sent.as_str()];

        quotations::table
            .filter(quotations::status.eq_any(open.to_vec()))
            .filter(quotations::valid_until.lt(today))
            .order(quotations::id.asc())
            .load::<DbQuotation>(&mut conn)?
            .into_iter()
            .map(|q| Quotation::try_from(q).map_err(RepositoryError::from))
            .collect()
    }
}

impl QuotationWriter for DieselRepository {
    fn create_quotation(&self, new_quotation: &NewQuotation) -> RepositoryResult<Quotation> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let hub_id = new_quotation.hub_id;

        let db_quotation = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let last = quotations::table
                .filter(quotations::hub_id.eq(hub_id.get()))
                .order(quotations::id.desc())
                .select(quotations::number)
                .first::<String>(conn)
                .optional()?;
            let number = next_document_number(QUOTATION_PREFIX, last.as_deref());
            let db_new = DbNewQuotation::new(hub_id, &number, &new_quotation.draft);

            Ok(diesel::insert_into(quotations::table)
                .values(&db_new)
                .get_result::<DbQuotation>(conn)?)
        })?;

        Quotation::try_from(db_quotation).map_err(RepositoryError::from)
    }

    fn update_quotation(
        &self,
        id: QuotationId,
        hub_id: HubId,
        draft: &QuotationDraft,
    ) -> RepositoryResult<Quotation> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateQuotation = draft.into();

        let db_quotation = diesel::update(
            quotations::table
                .filter(quotations::id.eq(id.get()))
                .filter(quotations::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbQuotation>(&mut conn)?;

        Quotation::try_from(db_quotation).map_err(RepositoryError::from)
    }

    fn delete_quotation(&self, id: QuotationId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            quotations::table
                .filter(quotations::id.eq(id.get()))
                .filter(quotations::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_quotation_status(
        &self,
        quotation: &Quotation,
        status: QuotationStatus,
    ) -> RepositoryResult<Quotation> {
        use crate::schema::quotations;

        let mut conn = self.conn()?;
        let db_quotation = diesel::update(
            quotations::table
                .filter(quotations::id.eq(quotation.id.get()))
                .filter(quotations::hub_id.eq(quotation.hub_id.get()))
                .filter(quotations::status.eq(quotation.status.as_str())),
        )
        .set((
            quotations::status.eq(status.as_str()),
            quotations::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbQuotation>(&mut conn)
        .optional()?;

        let Some(db_quotation) = db_quotation else {
            return Err(RepositoryError::ConstraintViolation(format!(
                "quotation {} is no longer {}",
                quotation.number,
                quotation.status.as_str()
            )));
        };
        Quotation::try_from(db_quotation).map_err(RepositoryError::from)
    }
}

impl InvoiceReader for DieselRepository {
    fn get_invoice_by_id(&self, id: InvoiceId, hub_id: HubId) -> RepositoryResult<Option<Invoice>> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_invoice = invoices::table
            .filter(invoices::id.eq(id.get()))
            .filter(invoices::hub_id.eq(hub_id.get()))
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        db_invoice
            .map(Invoice::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_invoice_by_public_id(&self, public_id: &PublicId) -> RepositoryResult<Option<Invoice>> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_invoice = invoices::table
            .filter(invoices::public_id.eq(public_id.to_string()))
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        db_invoice
            .map(Invoice::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = invoices::table
                .filter(invoices::hub_id.eq(query.hub_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(invoices::status.eq(status.as_str()));
            }
            if let Some(lead_id) = query.lead_id {
                items = items.filter(invoices::lead_id.eq(lead_id.get()));
            }
            if let Some(search) = &query.search {
                let pattern = like_pattern(search);
                items = items.filter(
                    invoices::customer_name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(invoices::number.like(pattern).escape(LIKE_ESCAPE)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(invoices::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let invoices = items
            .load::<DbInvoice>(&mut conn)?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, invoices))
    }

    fn invoice_exists_for_quotation(&self, quotation_id: QuotationId) -> RepositoryResult<bool> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            invoices::table.filter(invoices::quotation_id.eq(quotation_id.get())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn list_payments(&self, invoice_id: InvoiceId) -> RepositoryResult<Vec<Payment>> {
        use crate::schema::invoice_payments;

        let mut conn = self.conn()?;
        invoice_payments::table
            .filter(invoice_payments::invoice_id.eq(invoice_id.get()))
            .order((invoice_payments::paid_on.asc(), invoice_payments::id.asc()))
            .load::<DbPayment>(&mut conn)?
            .into_iter()
            .map(|p| Payment::try_from(p).map_err(RepositoryError::from))
            .collect()
    }

    fn get_payment_by_id(
        &self,
        id: PaymentId,
        invoice_id: InvoiceId,
    ) -> RepositoryResult<Option<Payment>> {
        use crate::schema::invoice_payments;

        let mut conn = self.conn()?;
        let db_payment = invoice_payments::table
            .filter(invoice_payments::id.eq(id.get()))
            .filter(invoice_payments::invoice_id.eq(invoice_id.get()))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        db_payment
            .map(Payment::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_invoices_due_before(&self, today: NaiveDate) -> RepositoryResult<Vec<Invoice>> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let open = [
            InvoiceStatus::Unpaid.as_str(),
            InvoiceStatus::PartiallyPaid.as_str(),
        ];

        invoices::table
            .filter(invoices::status.eq_any(open.to_vec()))
            .filter(invoices::due_date.lt(today))
            .order(invoices::id.asc())
            .load::<DbInvoice>(&mut conn)?
            .into_iter()
            .map(|i| Invoice::try_from(i).map_err(RepositoryError::from))
            .collect()
    }
}

impl InvoiceWriter for DieselRepository {
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let hub_id = new_invoice.hub_id;

        let db_invoice = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            if let Some(quotation_id) = new_invoice.quotation_id {
                let converted = diesel::select(diesel::dsl::exists(
                    invoices::table.filter(invoices::quotation_id.eq(quotation_id.get())),
                ))
                .get_result::<bool>(conn)?;
                if converted {
                    return Err(RepositoryError::ConstraintViolation(format!(
                        "quotation {quotation_id} already has an invoice"
                    )));
                }
            }

            let last = invoices::table
                .filter(invoices::hub_id.eq(hub_id.get()))
                .order(invoices::id.desc())
                .select(invoices::number)
                .first::<String>(conn)
                .optional()?;
            let number = next_document_number(INVOICE_PREFIX, last.as_deref());
            let db_new = DbNewInvoice::new(new_invoice, &number, PublicId::new().to_string());

            Ok(diesel::insert_into(invoices::table)
                .values(&db_new)
                .get_result::<DbInvoice>(conn)?)
        })?;

        Invoice::try_from(db_invoice).map_err(RepositoryError::from)
    }

    fn update_invoice(
        &self,
        id: InvoiceId,
        hub_id: HubId,
        draft: &InvoiceDraft,
    ) -> RepositoryResult<Invoice> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateInvoice = draft.into();

        let db_invoice = diesel::update(
            invoices::table
                .filter(invoices::id.eq(id.get()))
                .filter(invoices::hub_id.eq(hub_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbInvoice>(&mut conn)?;

        Invoice::try_from(db_invoice).map_err(RepositoryError::from)
    }

    fn delete_invoice(&self, id: InvoiceId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            invoices::table
                .filter(invoices::id.eq(id.get()))
                .filter(invoices::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_invoice_status(
        &self,
        invoice: &Invoice,
        status: InvoiceStatus,
    ) -> RepositoryResult<Invoice> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_invoice = diesel::update(
            invoices::table
                .filter(invoices::id.eq(invoice.id.get()))
                .filter(invoices::hub_id.eq(invoice.hub_id.get()))
                .filter(invoices::amount_paid.eq(invoice.amount_paid.get()))
                .filter(invoices::status.eq(invoice.status.as_str())),
        )
        .set((
            invoices::status.eq(status.as_str()),
            invoices::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbInvoice>(&mut conn)
        .optional()?;

        let Some(db_invoice) = db_invoice else {
            return Err(RepositoryError::ConstraintViolation(format!(
                "invoice {} changed before its status could be set",
                invoice.number
            )));
        };
        Invoice::try_from(db_invoice).map_err(RepositoryError::from)
    }

    fn record_payment(
        &self,
        invoice: &Invoice,
        payment: &NewPayment,
        settlement: &Settlement,
    ) -> RepositoryResult<(Invoice, Payment)> {
        use crate::schema::{invoice_payments, invoices};

        let mut conn = self.conn()?;
        let db_payment: DbNewPayment = payment.into();

        let (db_invoice, db_payment) =
            conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
                let updated = diesel::update(
                    invoices::table
                        .filter(invoices::id.eq(invoice.id.get()))
                        .filter(invoices::hub_id.eq(invoice.hub_id.get()))
                        .filter(invoices::amount_paid.eq(invoice.amount_paid.get()))
                        .filter(invoices::status.eq(invoice.status.as_str())),
                )
                .set((
                    invoices::amount_paid.eq(settlement.amount_paid.get()),
                    invoices::status.eq(settlement.status.as_str()),
                    invoices::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbInvoice>(conn)
                .optional()?;

                let Some(updated) = updated else {
                    return Err(RepositoryError::ConstraintViolation(format!(
                        "invoice {} changed while recording the payment",
                        invoice.number
                    )));
                };

                let created = diesel::insert_into(invoice_payments::table)
                    .values(&db_payment)
                    .get_result::<DbPayment>(conn)?;

                Ok((updated, created))
            })?;

        Ok((Invoice::try_from(db_invoice)?, Payment::try_from(db_payment)?))
    }

    fn delete_payment(
        &self,
        invoice: &Invoice,
        payment_id: PaymentId,
        settlement: &Settlement,
    ) -> RepositoryResult<Invoice> {
        use crate::schema::{invoice_payments, invoices};

        let mut conn = self.conn()?;

        let db_invoice = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let deleted = diesel::delete(
                invoice_payments::table
                    .filter(invoice_payments::id.eq(payment_id.get()))
                    .filter(invoice_payments::invoice_id.eq(invoice.id.get())),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::update(
                invoices::table
                    .filter(invoices::id.eq(invoice.id.get()))
                    .filter(invoices::hub_id.eq(invoice.hub_id.get()))
                    .filter(invoices::amount_paid.eq(invoice.amount_paid.get()))
                    .filter(invoices::status.eq(invoice.status.as_str())),
            )
            .set((
                invoices::amount_paid.eq(settlement.amount_paid.get()),
                invoices::status.eq(settlement.status.as_str()),
                invoices::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbInvoice>(conn)
            .optional()?
            .ok_or_else(|| {
                RepositoryError::ConstraintViolation(format!(
                    "invoice {} changed while removing the payment",
                    invoice.number
                ))
            })
        })?;

        Invoice::try_from(db_invoice).map_err(RepositoryError::from)
    }
}
