use async_trait::async_trait;
use chrono::NaiveDate;
use medslot_core::{
    errors::SlotResult,
    models::time_slot::{BulkOutcome, DateRange, SlotDraft, TimeSlot},
};
use mockall::mock;
use uuid::Uuid;

use crate::store::SlotStore;

// Mock store for testing callers of the SlotStore interface
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn create_bulk(
            &self,
            doctor_id: Uuid,
            branch_id: Uuid,
            candidates: Vec<SlotDraft>,
        ) -> SlotResult<BulkOutcome>;

        async fn book(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

        async fn release(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

        async fn delete(&self, slot_id: Uuid) -> SlotResult<()>;

        async fn get(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

        async fn list_by_doctor(
            &self,
            doctor_id: Uuid,
            range: DateRange,
        ) -> SlotResult<Vec<TimeSlot>>;

        async fn expire_before(&self, date: NaiveDate) -> SlotResult<u64>;
    }
}
