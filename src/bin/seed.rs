// src/bin/seed.rs
// Drives the running service over HTTP to create a small demo marketplace:
// one artist with a tour, one host in Texas, one fan, a confirmed booking
// and a seat reservation.

use anyhow::{bail, Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use dotenv::dotenv;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEMO_PASSWORD: &str = "Tourbus2024";

#[derive(Deserialize, Debug)]
struct AuthResponse {
    token: String,
    user: UserInfo,
}

#[derive(Deserialize, Debug)]
struct UserInfo {
    id: String,
    display_name: String,
}

#[derive(Deserialize, Debug)]
struct Created {
    id: String,
}

/// A signed-in demo account
struct Account {
    id: String,
    name: String,
    token: String,
}

struct Seeder {
    base_url: String,
    admin_token: String,
    client: Client,
    steps: Vec<(String, bool)>,
}

impl Seeder {
    fn new(base_url: String, admin_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url,
            admin_token,
            client,
            steps: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Register, or log in when the account already exists
    async fn account(&self, email: &str, display_name: &str, role: &str, profile: Value) -> Result<Account> {
        let payload = json!({
            "account": {
                "email": email,
                "password": DEMO_PASSWORD,
                "confirm_password": DEMO_PASSWORD,
                "display_name": display_name,
                "role": role,
            },
            "profile": profile,
        });

        let response = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let response = if response.status() == StatusCode::CONFLICT {
            println!("{}   {} already registered, logging in{}", YELLOW, email, RESET);
            self.client
                .post(format!("{}/api/auth/login", self.base_url))
                .json(&json!({ "email": email, "password": DEMO_PASSWORD }))
                .send()
                .await?
        } else {
            response
        };

        let auth: AuthResponse = Self::read(response).await?;
        Ok(Account {
            id: auth.user.id,
            name: auth.user.display_name,
            token: auth.token,
        })
    }

    async fn read<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {} - {}", status, body);
        }
        response.json::<T>().await.context("failed to parse response JSON")
    }

    async fn post_as<T: for<'de> Deserialize<'de>>(&self, token: &str, path: &str, body: Value) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn approve(&self, artist: &Account) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/admin/artists/{}/approve", self.base_url, artist.id))
            .header("X-Admin-Token", &self.admin_token)
            .send()
            .await?;

        // Already approved on a previous run
        if response.status() == StatusCode::CONFLICT {
            return Ok(());
        }
        Self::read::<Value>(response).await.map(|_| ())
    }

    fn record<T>(&mut self, label: &str, result: &Result<T>) {
        match result {
            Ok(_) => println!("{}✅ {}{}", GREEN, label, RESET),
            Err(e) => println!("{}❌ {}: {}{}", RED, label, e, RESET),
        }
        self.steps.push((label.to_string(), result.is_ok()));
    }

    async fn run(&mut self) -> Result<()> {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable.{}", RED, RESET);
            println!("{}Please ensure gigroute is running (cargo run){}", YELLOW, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let today = Utc::now().date_naive();
        let day = |offset: i64| -> NaiveDate { today + ChronoDuration::days(offset) };

        let artist = self
            .account(
                "lonestar.duo@example.com",
                "Lone Star Duo",
                "artist",
                json!({
                    "kind": "artist",
                    "stage_name": "Lone Star Duo",
                    "genres": ["folk", "americana"],
                    "home_state": "TX",
                    "home_city": "Austin",
                }),
            )
            .await;
        self.record("Artist account", &artist);
        let artist = artist?;

        let host = self
            .account(
                "barn.hall@example.com",
                "Barn Hall",
                "host",
                json!({
                    "kind": "host",
                    "venue_name": "The Barn Hall",
                    "offers_venue": true,
                    "offers_lodging": true,
                    "capacity": 80,
                    "lodging_beds": 3,
                    "city": "Marfa",
                    "state": "TX",
                }),
            )
            .await;
        self.record("Host account", &host);
        let host = host?;

        let fan = self
            .account(
                "front.row@example.com",
                "Front Row",
                "fan",
                json!({ "kind": "fan", "home_state": "TX", "favorite_genres": ["folk"] }),
            )
            .await;
        self.record("Fan account", &fan);
        let fan = fan?;

        let approval = self.approve(&artist).await;
        self.record("Artist approval", &approval);

        let tour: Result<Created> = self
            .post_as(
                &artist.token,
                "/api/tour-segments",
                json!({
                    "name": format!("Southwest run {}", day(30).format("%Y-%m")),
                    "state_ranges": [
                        { "state": "TX", "start_date": day(30), "end_date": day(34), "cities": ["Austin", "Marfa"] },
                        { "state": "NM", "start_date": day(34), "end_date": day(37), "cities": ["Santa Fe"] },
                        { "state": "AZ", "start_date": day(37), "end_date": day(40) },
                    ],
                }),
            )
            .await;
        self.record("Tour segment", &tour);

        let booking: Result<Created> = self
            .post_as(
                &artist.token,
                "/api/bookings",
                json!({
                    "host_id": host.id,
                    "event_date": day(32),
                    "includes_lodging": true,
                    "message": "We'd love to play the barn on our way west.",
                }),
            )
            .await;
        self.record("Booking request", &booking);

        if let Ok(booking) = &booking {
            let accepted: Result<Value> = self
                .post_as(&host.token, &format!("/api/bookings/{}/accept", booking.id), json!({}))
                .await;
            self.record("Booking accepted", &accepted);

            let reservation: Result<Value> = self
                .post_as(
                    &fan.token,
                    &format!("/api/bookings/{}/reservations", booking.id),
                    json!({ "seats": 2 }),
                )
                .await;
            self.record("Seat reservation", &reservation);
        }

        println!("\n{}Accounts (password {}):{}", BOLD, DEMO_PASSWORD, RESET);
        for account in [&artist, &host, &fan] {
            println!("  • {} {}{}{}", account.name, CYAN, account.id, RESET);
        }
        Ok(())
    }

    fn print_summary(&self, elapsed: f64) {
        let ok = self.steps.iter().filter(|(_, success)| *success).count();
        println!("\n{}📋 Seed Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────");
        for (label, success) in &self.steps {
            println!("{:<30} {}", label, if *success { "✅" } else { "❌" });
        }
        println!("──────────────────────────────────────────");
        println!("{}/{} steps succeeded in {:.1}s", ok, self.steps.len(), elapsed);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let admin_token = env::var("ADMIN_TOKEN").context("ADMIN_TOKEN must be set in .env")?;
    let base_url = env::var("GIGROUTE_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let started = Instant::now();
    let mut seeder = Seeder::new(base_url, admin_token)?;
    let result = seeder.run().await;
    seeder.print_summary(started.elapsed().as_secs_f64());
    result
}
