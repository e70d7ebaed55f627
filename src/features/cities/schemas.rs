use serde::Serialize;
use uuid::Uuid;

use crate::features::cities::models::City;

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
pub struct CityOut {
    pub id: Uuid,
    pub name: String,
    pub state: Option<String>,
    pub region: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: String,
}

impl From<City> for CityOut {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            state: (!city.state.is_empty()).then_some(city.state),
            region: (!city.region.is_empty()).then_some(city.region),
            country: city.country,
            latitude: city.latitude,
            longitude: city.longitude,
            photo: city.photo,
        }
    }
}

#[derive(Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<CityOut>,
}
