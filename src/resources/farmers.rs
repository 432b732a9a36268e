//! Farmer and farm queries.

use super::{Resources, FARMERS_KEY, FARMS_KEY};
use crate::error::Result;
use crate::models::{
    CreateFarmRequest, CreateFarmerRequest, Farm, Farmer, FarmerStatistics, Page, PageRequest,
    UpdateFarmRequest, UpdateFarmerRequest,
};
use crate::query::QueryState;
use crate::query_key;

impl Resources {
    pub async fn farmers(&self, page: PageRequest) -> QueryState<Page<Farmer>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![FARMERS_KEY, page.page, page.size], true, move || async move {
                api.list_farmers(page).await
            })
            .await
    }

    /// Disabled when `id` is empty.
    pub async fn farmer(&self, id: &str) -> QueryState<Farmer> {
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .query(query_key![FARMERS_KEY, &id], !id.is_empty(), move || async move {
                api.get_farmer(&id).await
            })
            .await
    }

    pub async fn farmer_statistics(&self) -> QueryState<FarmerStatistics> {
        let api = self.api.clone();
        self.cache
            .query(query_key![FARMERS_KEY, "statistics"], true, move || async move {
                api.farmer_statistics().await
            })
            .await
    }

    pub async fn create_farmer(&self, request: &CreateFarmerRequest) -> Result<Farmer> {
        let result = self.api.create_farmer(request).await;
        self.settle(
            result,
            &[query_key![FARMERS_KEY]],
            "Farmer created successfully",
            "Failed to create farmer",
        )
    }

    pub async fn update_farmer(&self, id: &str, request: &UpdateFarmerRequest) -> Result<Farmer> {
        let result = self.api.update_farmer(id, request).await;
        self.settle(
            result,
            &[query_key![FARMERS_KEY], query_key![FARMERS_KEY, id]],
            "Farmer updated successfully",
            "Failed to update farmer",
        )
    }

    pub async fn delete_farmer(&self, id: &str) -> Result<()> {
        let result = self.api.delete_farmer(id).await;
        self.settle(
            result,
            &[query_key![FARMERS_KEY]],
            "Farmer deleted successfully",
            "Failed to delete farmer",
        )
    }

    /// Disabled when `farmer_id` is empty.
    pub async fn farms(&self, farmer_id: &str, page: PageRequest) -> QueryState<Page<Farm>> {
        let api = self.api.clone();
        let farmer_id = farmer_id.to_string();
        self.cache
            .query(
                query_key![FARMS_KEY, &farmer_id, page.page, page.size],
                !farmer_id.is_empty(),
                move || async move { api.list_farms(&farmer_id, page).await },
            )
            .await
    }

    /// Disabled unless both ids are set.
    pub async fn farm(&self, farmer_id: &str, farm_id: &str) -> QueryState<Farm> {
        let api = self.api.clone();
        let farmer_id = farmer_id.to_string();
        let farm_id = farm_id.to_string();
        let enabled = !farmer_id.is_empty() && !farm_id.is_empty();
        self.cache
            .query(query_key![FARMS_KEY, &farmer_id, &farm_id], enabled, move || async move {
                api.get_farm(&farmer_id, &farm_id).await
            })
            .await
    }

    pub async fn create_farm(&self, farmer_id: &str, request: &CreateFarmRequest) -> Result<Farm> {
        let result = self.api.create_farm(farmer_id, request).await;
        self.settle(
            result,
            &[query_key![FARMS_KEY, farmer_id]],
            "Farm created successfully",
            "Failed to create farm",
        )
    }

    pub async fn update_farm(
        &self,
        farmer_id: &str,
        farm_id: &str,
        request: &UpdateFarmRequest,
    ) -> Result<Farm> {
        let result = self.api.update_farm(farmer_id, farm_id, request).await;
        self.settle(
            result,
            &[
                query_key![FARMS_KEY, farmer_id],
                query_key![FARMS_KEY, farmer_id, farm_id],
            ],
            "Farm updated successfully",
            "Failed to update farm",
        )
    }

    pub async fn delete_farm(&self, farmer_id: &str, farm_id: &str) -> Result<()> {
        let result = self.api.delete_farm(farmer_id, farm_id).await;
        self.settle(
            result,
            &[query_key![FARMS_KEY, farmer_id]],
            "Farm deleted successfully",
            "Failed to delete farm",
        )
    }
}
