//! Farmer and farm endpoints.

use crate::api::{segment, ApiClient};
use crate::error::Result;
use crate::models::{
    CreateFarmRequest, CreateFarmerRequest, Farm, Farmer, FarmerStatistics, Page, PageRequest,
    UpdateFarmRequest, UpdateFarmerRequest,
};

impl ApiClient {
    pub async fn list_farmers(&self, page: PageRequest) -> Result<Page<Farmer>> {
        self.get("/api/farmers", &page.query()).await
    }

    pub async fn get_farmer(&self, id: &str) -> Result<Farmer> {
        self.get(&format!("/api/farmers/{}", segment(id)), &[]).await
    }

    pub async fn create_farmer(&self, request: &CreateFarmerRequest) -> Result<Farmer> {
        self.post("/api/farmers", &[], request).await
    }

    pub async fn update_farmer(&self, id: &str, request: &UpdateFarmerRequest) -> Result<Farmer> {
        self.put(&format!("/api/farmers/{}", segment(id)), request).await
    }

    pub async fn delete_farmer(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/farmers/{}", segment(id))).await
    }

    pub async fn farmer_statistics(&self) -> Result<FarmerStatistics> {
        self.get("/api/farmers/statistics", &[]).await
    }

    pub async fn list_farms(&self, farmer_id: &str, page: PageRequest) -> Result<Page<Farm>> {
        self.get(&format!("/api/farmers/{}/farms", segment(farmer_id)), &page.query())
            .await
    }

    pub async fn get_farm(&self, farmer_id: &str, farm_id: &str) -> Result<Farm> {
        self.get(&format!("/api/farmers/{}/farms/{}", segment(farmer_id), segment(farm_id)), &[])
            .await
    }

    pub async fn create_farm(&self, farmer_id: &str, request: &CreateFarmRequest) -> Result<Farm> {
        self.post(&format!("/api/farmers/{}/farms", segment(farmer_id)), &[], request)
            .await
    }

    pub async fn update_farm(
        &self,
        farmer_id: &str,
        farm_id: &str,
        request: &UpdateFarmRequest,
    ) -> Result<Farm> {
        self.put(&format!("/api/farmers/{}/farms/{}", segment(farmer_id), segment(farm_id)), request)
            .await
    }

    pub async fn delete_farm(&self, farmer_id: &str, farm_id: &str) -> Result<()> {
        self.delete(&format!("/api/farmers/{}/farms/{}", segment(farmer_id), segment(farm_id)))
            .await
    }
}
