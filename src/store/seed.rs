use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{CreateEvent, UserType};
use crate::store::attendees::Registrant;
use crate::store::Store;
use crate::utils::error::AppError;

/// Loads a handful of demo events with partially filled attendee lists.
/// Idempotent: a store that already holds events is left alone.
pub async fn seed_demo_data(store: &Store) -> Result<(), AppError> {
    if !store.list_events().await.is_empty() {
        return Ok(());
    }

    let organizers = [
        ("Tech Academy", "contato@techacademy.com"),
        ("AI Institute", "contato@aiinstitute.com"),
        ("Startup Hub", "contato@startuphub.com"),
        ("Design School", "contato@designschool.com"),
    ];

    let today = Utc::now().date_naive();
    let templates = [
        (
            "Workshop de React Avançado",
            "Aprenda técnicas avançadas de React com hooks customizados e otimização de performance.",
            "Centro de Convenções - São Paulo",
            "tecnologia",
            50,
            14,
        ),
        (
            "Palestra: Futuro da IA",
            "Discussão sobre as tendências e impactos da inteligência artificial no mercado.",
            "Auditório Central - Rio de Janeiro",
            "tecnologia",
            100,
            19,
        ),
        (
            "Encontro de Empreendedores",
            "Networking e troca de experiências entre empreendedores de diversos setores.",
            "Hub de Inovação - Belo Horizonte",
            "negocios",
            80,
            18,
        ),
        (
            "Workshop de Design UX/UI",
            "Aprenda os fundamentos do design de experiência do usuário e interface.",
            "Escola de Design - Porto Alegre",
            "design",
            30,
            9,
        ),
    ];

    for (i, (title, description, location, category, capacity, hour)) in
        templates.into_iter().enumerate()
    {
        let (org_name, org_email) = organizers[i];
        let organizer = match store.user_by_email(org_email).await {
            Some(user) => user,
            None => {
                let password = super::users::seed_password();
                store.create_user(org_name, org_email, &password).await?
            }
        };

        let event = store
            .create_event(
                &organizer,
                CreateEvent {
                    title: title.to_string(),
                    description: description.to_string(),
                    location: location.to_string(),
                    category: category.to_string(),
                    date: today + Duration::days(10 + 5 * i as i64),
                    time: chrono::NaiveTime::from_hms_opt(hour, 0, 0)
                        .unwrap_or_default(),
                    capacity,
                    price: Decimal::ZERO,
                },
            )
            .await?;

        let fill = rand::thread_rng().gen_range(0..(capacity * 4 / 5).max(1));
        for n in 0..fill {
            store
                .register_attendee(
                    event.id,
                    Registrant {
                        name: format!("Participante {}", n + 1),
                        email: format!("participante{}@email.com", n + 1),
                        phone: Some(format!("(11) 9999{:04}", n)),
                        user_type: UserType::Participant,
                    },
                )
                .await?;
        }
    }

    tracing::info!("Demo data seeded");
    Ok(())
}
