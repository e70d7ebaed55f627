use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    features::cities::{
        repository::{get_many_cities, get_one_city},
        schemas::{CitiesResponse, CityOut},
    },
    services::database::Database,
    utilities::errors::AppError,
};

pub async fn get_many_cities_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let cities = get_many_cities(&database.pool).await?;

    Ok(Json(CitiesResponse {
        cities: cities.into_iter().map(CityOut::from).collect(),
    }))
}

pub async fn get_one_city_handler(
    State(database): State<Database>,
    Path(city_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let city = get_one_city(&database.pool, &city_id).await?;

    Ok(Json(CityOut::from(city)))
}
