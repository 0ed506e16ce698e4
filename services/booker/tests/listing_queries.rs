//! Listing query engine against a live PostgreSQL
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a
//! disposable database. Every test works inside its own made-up country so
//! rows left by other tests do not interfere.

use booker::{
    listing::{HOME_PAGE_SAMPLE_SIZE, LookupCriteria, SearchCriteria, SortOrder},
    models::{BookingRequest, HotelChanges, NewHotel, NewOrder, NewUser},
    repositories::{HotelRepository, OrderRepository, UserRepository},
};
use chrono::NaiveDate;
use common::database::{DatabaseConfig, init_pool, run_migrations};
use serial_test::serial;
use sqlx::PgPool;
use std::{collections::HashSet, time::Duration};
use uuid::Uuid;

async fn pool() -> PgPool {
    let pool = init_pool(&DatabaseConfig::from_env().unwrap())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// A single lowercase word no other test will produce
fn unique_tag() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(10)
        .map(|c| char::from(b'a' + c.to_digit(16).unwrap_or(0) as u8))
        .collect()
}

fn hotel(name: &str, country: &str, stars: i16, cost: f64, available: bool) -> NewHotel {
    NewHotel {
        name: name.to_string(),
        description: format!("{name} description"),
        image: None,
        star_rating: stars,
        country: country.to_string(),
        cost_per_night: cost,
        available,
    }
}

async fn cleanup(pool: &PgPool, country: &str) {
    sqlx::query("DELETE FROM hotels WHERE country = $1")
        .bind(country)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_unavailable_hotels_are_hidden_from_listings_and_search() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    let open = repo.create(hotel("Open House", &country, 3, 80.0, true)).await.unwrap();
    let closed = repo.create(hotel("Closed House", &country, 3, 90.0, false)).await.unwrap();

    let available = repo.list_available().await.unwrap();
    assert!(available.iter().any(|h| h.id == open.id));
    assert!(available.iter().all(|h| h.id != closed.id));

    let found = repo
        .search(SearchCriteria {
            destination: country.clone(),
            min_stars: 1,
            sort: SortOrder::Ascending,
        })
        .await
        .unwrap();
    assert_eq!(found.iter().map(|h| h.id).collect::<Vec<_>>(), vec![open.id]);

    // Browsing by country shows both
    let by_country = repo.list_by_country(&country).await.unwrap();
    assert_eq!(by_country.len(), 2);
    assert!(repo.list_countries().await.unwrap().contains(&country));

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_search_applies_star_floor_and_price_order() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    repo.create(hotel("Budget Inn", &country, 2, 40.0, true)).await.unwrap();
    let mid = repo.create(hotel("Comfort Stay", &country, 4, 120.0, true)).await.unwrap();
    let top = repo.create(hotel("Grand Palace", &country, 5, 300.0, true)).await.unwrap();

    let mut criteria = SearchCriteria {
        destination: country.clone(),
        min_stars: 4,
        sort: SortOrder::Ascending,
    };
    let ascending = repo.search(criteria.clone()).await.unwrap();
    assert_eq!(
        ascending.iter().map(|h| h.id).collect::<Vec<_>>(),
        vec![mid.id, top.id]
    );

    criteria.sort = SortOrder::Descending;
    let descending = repo.search(criteria).await.unwrap();
    assert_eq!(
        descending.iter().map(|h| h.id).collect::<Vec<_>>(),
        vec![top.id, mid.id]
    );

    // Phrase match on the name, any case
    let by_name = repo
        .search(SearchCriteria {
            destination: "grand palace".to_string(),
            min_stars: 5,
            sort: SortOrder::Ascending,
        })
        .await
        .unwrap();
    assert!(by_name.iter().any(|h| h.id == top.id));

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_lookup_by_id_or_case_insensitive_name() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());
    let name = format!("Ritz {}", unique_tag());

    let created = repo.create(hotel(&name, &country, 5, 500.0, false)).await.unwrap();

    let by_name = repo
        .find_by_id_or_name(LookupCriteria {
            id: None,
            name: Some(name.to_uppercase()),
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, created.id);

    let by_id = repo
        .find_by_id_or_name(LookupCriteria {
            id: Some(created.id),
            name: Some("no such hotel".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_id.len(), 1);

    assert!(
        repo.find_by_id_or_name(LookupCriteria::default())
            .await
            .unwrap()
            .is_empty()
    );

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_partial_update_and_delete() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    let created = repo.create(hotel("Seaside", &country, 3, 99.5, true)).await.unwrap();

    let updated = repo
        .update(
            created.id,
            HotelChanges {
                cost_per_night: Some(110.0),
                available: Some(false),
                ..HotelChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.cost_per_night, 110.0);
    assert!(!updated.available);
    assert_eq!(updated.name, "Seaside");
    assert_eq!(updated.star_rating, 3);
    assert!(updated.updated_at >= created.updated_at);

    assert!(
        repo.update(Uuid::new_v4(), HotelChanges::default())
            .await
            .unwrap()
            .is_none()
    );

    assert_eq!(repo.delete(created.id).await.unwrap(), Some(created.id));
    assert_eq!(repo.delete(created.id).await.unwrap(), None);
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_home_page_sample_is_bounded_and_available() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    for i in 0..12 {
        repo.create(hotel(&format!("Sample {i}"), &country, 3, 50.0, true))
            .await
            .unwrap();
    }

    let sample = repo.home_page_sample().await.unwrap();
    assert_eq!(sample.hotels.len() as i64, HOME_PAGE_SAMPLE_SIZE);
    assert!(sample.hotels.iter().all(|h| h.available));
    assert!(sample.countries.len() as i64 <= HOME_PAGE_SAMPLE_SIZE);

    let mut countries = sample.countries.clone();
    countries.sort();
    countries.dedup();
    assert_eq!(countries.len(), sample.countries.len());

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_home_page_sample_takes_whole_small_population() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    for i in 0..3 {
        repo.create(hotel(&format!("Small {i}"), &country, 3, 50.0, true))
            .await
            .unwrap();
    }
    repo.create(hotel("Small closed", &country, 3, 50.0, false))
        .await
        .unwrap();

    let available: HashSet<Uuid> = repo
        .list_available()
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.id)
        .collect();
    let countries: HashSet<String> = repo.list_countries().await.unwrap().into_iter().collect();

    let sample = repo.home_page_sample().await.unwrap();

    let sampled: HashSet<Uuid> = sample.hotels.iter().map(|h| h.id).collect();
    assert_eq!(sampled.len(), sample.hotels.len(), "duplicate hotels");
    assert_eq!(
        sample.hotels.len(),
        available.len().min(HOME_PAGE_SAMPLE_SIZE as usize)
    );
    assert!(sampled.is_subset(&available));
    if available.len() < HOME_PAGE_SAMPLE_SIZE as usize {
        assert_eq!(sampled, available);
    }

    let sampled_countries: HashSet<String> = sample.countries.iter().cloned().collect();
    assert_eq!(
        sampled_countries.len(),
        sample.countries.len(),
        "duplicate countries"
    );
    assert_eq!(
        sample.countries.len(),
        countries.len().min(HOME_PAGE_SAMPLE_SIZE as usize)
    );
    assert!(sampled_countries.is_subset(&countries));
    if countries.len() < HOME_PAGE_SAMPLE_SIZE as usize {
        assert_eq!(sampled_countries, countries);
    }

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_empty_destination_matches_nothing() {
    let pool = pool().await;
    let repo = HotelRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    repo.create(hotel("The Harbour", &country, 4, 75.0, true))
        .await
        .unwrap();

    // Blank input and a lone stop word both reduce to an empty phrase
    for destination in ["", "   ", "the"] {
        let found = repo
            .search(SearchCriteria {
                destination: destination.to_string(),
                min_stars: 1,
                sort: SortOrder::Ascending,
            })
            .await
            .unwrap();
        assert!(found.is_empty(), "{destination:?} matched {found:?}");
    }

    cleanup(&pool, &country).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_orders_survive_hotel_removal() {
    let pool = pool().await;
    let hotels = HotelRepository::new(pool.clone());
    let orders = OrderRepository::new(pool.clone());
    let users = UserRepository::new(pool.clone());
    let country = format!("Land{}", unique_tag());

    let user = users
        .create(&NewUser {
            username: format!("u_{}", unique_tag()),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .unwrap();
    let stay = hotels.create(hotel("Harbour View", &country, 4, 150.0, true)).await.unwrap();

    let booking = BookingRequest {
        hotel_id: stay.id,
        date_of_departure: NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
        nights: 3,
        guests: 2,
    };
    let first = orders
        .create(NewOrder {
            user_id: user.id,
            hotel_id: stay.id,
            order_details: booking.order_details(stay.cost_per_night),
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = orders
        .create(NewOrder {
            user_id: user.id,
            hotel_id: stay.id,
            order_details: booking.order_details(stay.cost_per_night),
        })
        .await
        .unwrap();
    assert_eq!(first.order_details.0["total_cost"], 450.0);

    let mine = orders.list_for_user(user.id).await.unwrap();
    assert_eq!(
        mine.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );
    assert_eq!(mine[0].hotel_name.as_deref(), Some("Harbour View"));

    hotels.delete(stay.id).await.unwrap();
    let mine = orders.list_for_user(user.id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o.hotel_name.is_none()));

    let all = orders.list_all().await.unwrap();
    let listed = all.iter().find(|o| o.id == first.id).unwrap();
    assert_eq!(listed.username.as_deref(), Some(user.username.as_str()));

    sqlx::query("DELETE FROM orders WHERE user_id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    cleanup(&pool, &country).await;
}
