//! Sample events inserted into an empty store at start-up.

use chrono::{DateTime, Duration, Utc};

use crate::models::{EventCategory, EventFields, EventStatus, NewEvent};
use crate::repository::{EventRepository, StoreError};

struct Sample {
    title: &'static str,
    description: &'static str,
    days_ahead: i64,
    location: &'static str,
    organizer: &'static str,
    category: EventCategory,
    max_capacity: i32,
    current_registrations: i32,
    image_url: &'static str,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Conferência de Tecnologia e Inovação",
        description: "A gathering on new technology trends in Mozambique and Africa. \
                      Invited speakers present recent work on AI, cloud computing and mobile development.",
        days_ahead: 5,
        location: "Complexo Pedagógico - Auditório Principal",
        organizer: "Faculdade de Engenharia - UEM",
        category: EventCategory::Tech,
        max_capacity: 150,
        current_registrations: 45,
        image_url: "https://images.unsplash.com/photo-1540575467063-178a50c2df87?w=800",
        tags: &["Tecnologia", "Inovação", "IA", "Cloud"],
    },
    Sample {
        title: "Cerimónia de Graduação",
        description: "Graduation ceremony for this year's finalists, celebrating the academic \
                      achievements of our graduates with their families.",
        days_ahead: 8,
        location: "Estádio Universitário",
        organizer: "Reitoria da UEM",
        category: EventCategory::Graduation,
        max_capacity: 500,
        current_registrations: 320,
        image_url: "https://images.unsplash.com/photo-1523050854058-8df90110c9f1?w=800",
        tags: &["Graduação", "Formatura", "Celebração"],
    },
    Sample {
        title: "Feira de Carreiras UEM",
        description: "Internship and job opportunities for students and recent graduates. \
                      Leading Mozambican companies will be recruiting on site.",
        days_ahead: 15,
        location: "Biblioteca Central - Pavilhão de Exposições",
        organizer: "Departamento de Carreiras e Empregabilidade",
        category: EventCategory::Career,
        max_capacity: 200,
        current_registrations: 87,
        image_url: "https://images.unsplash.com/photo-1511578314322-379afb476865?w=800",
        tags: &["Carreira", "Emprego", "Estágio", "Networking"],
    },
    Sample {
        title: "Workshop de Desenvolvimento Web Moderno",
        description: "Build professional web applications with React, Node.js and MongoDB. \
                      A practical workshop with hands-on projects.",
        days_ahead: 10,
        location: "Laboratório de Informática - Sala 203",
        organizer: "Departamento de Matemática e Informática",
        category: EventCategory::Workshop,
        max_capacity: 30,
        current_registrations: 28,
        image_url: "https://images.unsplash.com/photo-1517180102446-f3ece451e9d8?w=800",
        tags: &["Programação", "Web", "React", "Node.js"],
    },
    Sample {
        title: "Festival Cultural Universitário",
        description: "Music, dance and theatre from every province, performed by student \
                      groups across the university.",
        days_ahead: 20,
        location: "Praça da Cultura - Campus Principal",
        organizer: "Associação de Estudantes da UEM",
        category: EventCategory::Cultural,
        max_capacity: 800,
        current_registrations: 210,
        image_url: "https://images.unsplash.com/photo-1533174072545-7a4b6ad7a6c3?w=800",
        tags: &["Cultura", "Música", "Dança"],
    },
    Sample {
        title: "Torneio Inter-Faculdades de Futebol",
        description: "The annual football tournament between faculties. Come and support \
                      your faculty's team.",
        days_ahead: 12,
        location: "Campo de Jogos da UEM",
        organizer: "Direcção dos Serviços Sociais - Desporto",
        category: EventCategory::Sports,
        max_capacity: 400,
        current_registrations: 400,
        image_url: "https://images.unsplash.com/photo-1574629810360-7efbbe195018?w=800",
        tags: &["Desporto", "Futebol", "Competição"],
    },
    Sample {
        title: "Seminário de Investigação em Saúde Pública",
        description: "Researchers from the Faculty of Medicine present recent findings on \
                      public health in Mozambique.",
        days_ahead: 25,
        location: "Faculdade de Medicina - Anfiteatro A",
        organizer: "Faculdade de Medicina - UEM",
        category: EventCategory::Seminar,
        max_capacity: 120,
        current_registrations: 34,
        image_url: "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?w=800",
        tags: &["Saúde", "Investigação", "Medicina"],
    },
    Sample {
        title: "Aula Inaugural do Ano Académico",
        description: "Opening lecture of the academic year, given by a guest professor and \
                      open to the whole university community.",
        days_ahead: 30,
        location: "Aula Magna",
        organizer: "Reitoria da UEM",
        category: EventCategory::Academic,
        max_capacity: 600,
        current_registrations: 0,
        image_url: "https://images.unsplash.com/photo-1524178232363-1fb2b075b655?w=800",
        tags: &["Académico", "Aula Inaugural"],
    },
];

fn sample_events(now: DateTime<Utc>) -> impl Iterator<Item = NewEvent> {
    SAMPLES.iter().map(move |sample| NewEvent {
        fields: EventFields {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            event_date: now + Duration::days(sample.days_ahead),
            location: sample.location.to_string(),
            organizer: sample.organizer.to_string(),
            category: sample.category,
            max_capacity: sample.max_capacity,
            image_url: Some(sample.image_url.to_string()),
            tags: sample.tags.iter().map(|t| t.to_string()).collect(),
        },
        status: EventStatus::Upcoming,
        current_registrations: sample.current_registrations,
        created_at: now,
    })
}

/// Returns the number of events inserted; zero when the store already had data.
pub async fn seed_sample_events(
    repository: &dyn EventRepository,
    now: DateTime<Utc>,
) -> Result<usize, StoreError> {
    if repository.count().await? > 0 {
        tracing::debug!("Store already populated, skipping sample data");
        return Ok(0);
    }

    tracing::info!("Populating store with sample events");
    let inserted = repository.insert_all(sample_events(now).collect()).await?;
    tracing::info!(inserted, "Sample events inserted");
    Ok(inserted)
}
