use crate::core::dispatch::{callback, DispatchMode};
use crate::core::provider::DataProvider;

pub const DEFAULT_DASHBOARD_ENDPOINT: &str = "http://localhost:8888/recru_analy/data";

/// 招聘分析儀表板：初始化時取一次城市需求資料並記錄回應
pub struct Dashboard<M: DispatchMode> {
    provider: DataProvider<M>,
    endpoint: String,
}

impl<M: DispatchMode> Dashboard<M> {
    pub fn new(provider: DataProvider<M>) -> Self {
        Self::with_endpoint(provider, DEFAULT_DASHBOARD_ENDPOINT)
    }

    pub fn with_endpoint(provider: DataProvider<M>, endpoint: &str) -> Self {
        Self {
            provider,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn init(&self) -> M::Output {
        tracing::info!("📊 Dashboard initializing");
        self.get_city_demand()
    }

    pub fn get_city_demand(&self) -> M::Output {
        self.provider.get_data(
            &self.endpoint,
            callback(|response| {
                tracing::info!("response {}", response);
            }),
        )
    }
}
