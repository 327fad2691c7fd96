//! Check-in service
//!
//! Orchestrates guest lookups, stay pricing and persistence of check-ins.

use chrono::{DateTime, Utc};
use guesthouse_core::{
    models::{CheckIn, Stay, StayQuote},
    traits::{CheckInRepository, GuestRepository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::stay_cost::{validate_stay, StayCostCalculator};

/// Request to register a new check-in
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub guest_id: i64,
    pub stay: Stay,
}

/// Partial update of a stored check-in; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct CheckInChanges {
    pub guest_id: Option<i64>,
    pub entry_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    pub additional_vehicle: Option<bool>,
}

impl CheckInChanges {
    fn apply(&self, check_in: &mut CheckIn) {
        if let Some(guest_id) = self.guest_id {
            check_in.guest_id = guest_id;
        }
        if let Some(entry_date) = self.entry_date {
            check_in.entry_date = entry_date;
        }
        if let Some(departure_date) = self.departure_date {
            check_in.departure_date = departure_date;
        }
        if let Some(additional_vehicle) = self.additional_vehicle {
            check_in.additional_vehicle = additional_vehicle;
        }
    }
}

/// Check-in service
///
/// Every stored check-in carries the cost computed from its stay at the
/// time it was written.
pub struct CheckInService<C: CheckInRepository, G: GuestRepository> {
    check_ins: Arc<C>,
    guests: Arc<G>,
    calculator: Arc<StayCostCalculator>,
}

impl<C: CheckInRepository, G: GuestRepository> CheckInService<C, G> {
    /// Create a new check-in service
    pub fn new(check_ins: Arc<C>, guests: Arc<G>, calculator: Arc<StayCostCalculator>) -> Self {
        Self {
            check_ins,
            guests,
            calculator,
        }
    }

    async fn ensure_guest(&self, guest_id: i64) -> AppResult<()> {
        self.guests
            .find_by_id(guest_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::GuestNotFound(guest_id.to_string()))
    }

    /// Price the stay and store a new check-in
    #[instrument(skip(self, new), fields(guest_id = new.guest_id))]
    pub async fn register(&self, new: NewCheckIn) -> AppResult<CheckIn> {
        self.ensure_guest(new.guest_id).await?;

        let (entry_date, departure_date) = validate_stay(&new.stay)?;
        let total_cost = self.calculator.compute_total(&new.stay)?;

        let check_in = self
            .check_ins
            .create(&CheckIn {
                guest_id: new.guest_id,
                entry_date,
                departure_date,
                additional_vehicle: new.stay.additional_vehicle,
                total_cost,
                ..Default::default()
            })
            .await?;

        info!(
            check_in_id = check_in.id,
            total_cost = %check_in.total_cost,
            "Check-in registered"
        );
        Ok(check_in)
    }

    /// Apply changes to a stored check-in and recompute its cost
    #[instrument(skip(self, changes))]
    pub async fn reprice(&self, id: i64, changes: CheckInChanges) -> AppResult<CheckIn> {
        let mut check_in = self
            .check_ins
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CheckInNotFound(id.to_string()))?;

        if let Some(guest_id) = changes.guest_id {
            self.ensure_guest(guest_id).await?;
        }

        changes.apply(&mut check_in);
        let previous = check_in.total_cost;
        check_in.total_cost = self.calculator.compute_total(&check_in.stay())?;

        debug!(%previous, total_cost = %check_in.total_cost, "Check-in repriced");
        self.check_ins.update(&check_in).await
    }

    /// Price a stay without storing anything
    pub fn quote(&self, stay: &Stay) -> AppResult<StayQuote> {
        self.calculator.quote(stay)
    }

    /// Cost of the guest's most recent check-in, `None` when there is none
    #[instrument(skip(self))]
    pub async fn last_booking_amount(&self, guest_id: i64) -> AppResult<Option<Decimal>> {
        self.ensure_guest(guest_id).await?;
        self.check_ins.last_booking_amount(guest_id).await
    }

    /// Sum of all the guest's check-in costs
    #[instrument(skip(self))]
    pub async fn total_amount(&self, guest_id: i64) -> AppResult<Decimal> {
        self.ensure_guest(guest_id).await?;
        self.check_ins.total_amount(guest_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;
    use guesthouse_core::{models::Guest, traits::Repository};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Sao_Paulo
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    struct MockGuestRepository {
        guests: Vec<Guest>,
    }

    #[async_trait]
    impl Repository<Guest, i64> for MockGuestRepository {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<Guest>> {
            Ok(self.guests.iter().find(|g| g.id == id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Guest>> {
            Ok(self.guests.clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.guests.len() as i64)
        }

        async fn create(&self, entity: &Guest) -> AppResult<Guest> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Guest) -> AppResult<Guest> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i64) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl GuestRepository for MockGuestRepository {
        async fn find_by_data(&self, data: &str) -> AppResult<Vec<Guest>> {
            Ok(self.guests.iter().filter(|g| g.matches(data)).cloned().collect())
        }

        async fn find_past(&self, _now: DateTime<Utc>) -> AppResult<Vec<Guest>> {
            Ok(vec![])
        }

        async fn find_current(&self, _now: DateTime<Utc>) -> AppResult<Vec<Guest>> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct MockCheckInRepository {
        rows: Mutex<Vec<CheckIn>>,
    }

    #[async_trait]
    impl Repository<CheckIn, i64> for MockCheckInRepository {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<CheckIn>> {
            Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<CheckIn>> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.rows.lock().unwrap().len() as i64)
        }

        async fn create(&self, entity: &CheckIn) -> AppResult<CheckIn> {
            let mut rows = self.rows.lock().unwrap();
            let stored = CheckIn {
                id: rows.len() as i64 + 1,
                ..entity.clone()
            };
            rows.push(stored.clone());
            Ok(stored)
        }

        async fn update(&self, entity: &CheckIn) -> AppResult<CheckIn> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|c| c.id == entity.id)
                .ok_or_else(|| AppError::CheckInNotFound(entity.id.to_string()))?;
            *row = entity.clone();
            Ok(entity.clone())
        }

        async fn delete(&self, id: i64) -> AppResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.id != id);
            Ok(rows.len() < before)
        }
    }

    #[async_trait]
    impl CheckInRepository for MockCheckInRepository {
        async fn find_by_guest_data(&self, _data: &str) -> AppResult<Vec<CheckIn>> {
            Ok(vec![])
        }

        async fn find_by_guest(&self, guest_id: i64) -> AppResult<Vec<CheckIn>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.guest_id == guest_id)
                .cloned()
                .collect())
        }

        async fn count_by_guest(&self, guest_id: i64) -> AppResult<i64> {
            Ok(self.find_by_guest(guest_id).await?.len() as i64)
        }

        async fn last_booking_amount(&self, guest_id: i64) -> AppResult<Option<Decimal>> {
            Ok(self
                .find_by_guest(guest_id)
                .await?
                .iter()
                .max_by_key(|c| c.id)
                .map(|c| c.total_cost))
        }

        async fn total_amount(&self, guest_id: i64) -> AppResult<Decimal> {
            Ok(self
                .find_by_guest(guest_id)
                .await?
                .iter()
                .map(|c| c.total_cost)
                .sum())
        }
    }

    fn service() -> (
        CheckInService<MockCheckInRepository, MockGuestRepository>,
        Arc<MockCheckInRepository>,
    ) {
        let guests = Arc::new(MockGuestRepository {
            guests: vec![
                Guest {
                    id: 1,
                    name: "Ana Souza".to_string(),
                    document: Some("123.456.789-00".to_string()),
                    ..Default::default()
                },
                Guest {
                    id: 2,
                    name: "Bruno Lima".to_string(),
                    telephone: Some("+55 11 99999-0000".to_string()),
                    ..Default::default()
                },
            ],
        });
        let check_ins = Arc::new(MockCheckInRepository::default());
        let calculator = Arc::new(StayCostCalculator::default());

        (
            CheckInService::new(check_ins.clone(), guests, calculator),
            check_ins,
        )
    }

    #[tokio::test]
    async fn test_register_stores_computed_cost() {
        let (service, repo) = service();

        // Friday noon to Sunday morning with a car
        let check_in = service
            .register(NewCheckIn {
                guest_id: 1,
                stay: Stay::new(at(2024, 1, 12, 12), at(2024, 1, 14, 9), true),
            })
            .await
            .unwrap();

        assert_eq!(check_in.id, 1);
        assert_eq!(check_in.total_cost, dec!(305));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_unknown_guest() {
        let (service, repo) = service();

        let result = service
            .register(NewCheckIn {
                guest_id: 42,
                stay: Stay::new(at(2024, 1, 8, 14), at(2024, 1, 10, 10), false),
            })
            .await;

        assert!(matches!(result, Err(AppError::GuestNotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_invalid_stay_stores_nothing() {
        let (service, repo) = service();

        let reversed = service
            .register(NewCheckIn {
                guest_id: 1,
                stay: Stay::new(at(2024, 1, 10, 10), at(2024, 1, 8, 14), false),
            })
            .await;
        assert!(matches!(reversed, Err(AppError::InvalidStayInterval(_))));

        let missing = service
            .register(NewCheckIn {
                guest_id: 1,
                stay: Stay {
                    entry_date: Some(at(2024, 1, 8, 14)),
                    departure_date: None,
                    additional_vehicle: false,
                },
            })
            .await;
        assert!(matches!(missing, Err(AppError::MissingDate(_))));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reprice_applies_changes() {
        let (service, _) = service();

        let stored = service
            .register(NewCheckIn {
                guest_id: 1,
                stay: Stay::new(at(2024, 1, 8, 14), at(2024, 1, 10, 10), false),
            })
            .await
            .unwrap();
        assert_eq!(stored.total_cost, dec!(240));

        let repriced = service
            .reprice(
                stored.id,
                CheckInChanges {
                    departure_date: Some(at(2024, 1, 10, 18)),
                    additional_vehicle: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // three working nights plus three nights of garage
        assert_eq!(repriced.total_cost, dec!(405));
        assert_eq!(repriced.entry_date, stored.entry_date);
        assert!(repriced.additional_vehicle);
    }

    #[tokio::test]
    async fn test_reprice_missing_or_invalid() {
        let (service, _) = service();

        let missing = service.reprice(99, CheckInChanges::default()).await;
        assert!(matches!(missing, Err(AppError::CheckInNotFound(_))));

        let stored = service
            .register(NewCheckIn {
                guest_id: 2,
                stay: Stay::new(at(2024, 1, 8, 14), at(2024, 1, 10, 10), false),
            })
            .await
            .unwrap();

        let unknown_guest = service
            .reprice(
                stored.id,
                CheckInChanges {
                    guest_id: Some(7),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(unknown_guest, Err(AppError::GuestNotFound(_))));

        let reversed = service
            .reprice(
                stored.id,
                CheckInChanges {
                    departure_date: Some(at(2024, 1, 1, 10)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(reversed, Err(AppError::InvalidStayInterval(_))));
    }

    #[tokio::test]
    async fn test_guest_amounts() {
        let (service, _) = service();

        assert_eq!(service.last_booking_amount(1).await.unwrap(), None);
        assert_eq!(service.total_amount(1).await.unwrap(), Decimal::ZERO);

        for (entry, departure) in [
            (at(2024, 1, 8, 14), at(2024, 1, 10, 10)),
            (at(2024, 1, 12, 12), at(2024, 1, 14, 9)),
        ] {
            service
                .register(NewCheckIn {
                    guest_id: 1,
                    stay: Stay::new(entry, departure, false),
                })
                .await
                .unwrap();
        }

        assert_eq!(service.last_booking_amount(1).await.unwrap(), Some(dec!(270)));
        assert_eq!(service.total_amount(1).await.unwrap(), dec!(510));
        assert_eq!(service.total_amount(2).await.unwrap(), Decimal::ZERO);

        assert!(matches!(
            service.total_amount(3).await,
            Err(AppError::GuestNotFound(_))
        ));
        assert!(matches!(
            service.last_booking_amount(3).await,
            Err(AppError::GuestNotFound(_))
        ));
    }

    #[test]
    fn test_quote() {
        let (service, _) = service();
        let quote = service
            .quote(&Stay::new(at(2024, 1, 8, 14), at(2024, 1, 10, 18), false))
            .unwrap();

        assert!(quote.late_departure);
        assert_eq!(quote.total, dec!(360));
    }
}
