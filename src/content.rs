//! Static catalogs rendered by the two carousels.
//!
//! The controllers only ever see the catalog lengths; the view looks items up
//! by index.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    /// Two-letter initials shown in place of a photo.
    pub avatar: &'static str,
    /// Stars out of five.
    pub rating: u8,
    pub text: &'static str,
}

pub const SERVICES: [Service; 4] = [
    Service {
        title: "CONTROL DE ACCESOS",
        description: "Implementamos sistemas y personal especializado para gestionar y restringir el acceso a tus instalaciones, asegurando máxima protección.",
        link: "#seguridad-fisica",
    },
    Service {
        title: "COBRO DE DEUDAS",
        description: "Recuperamos tu dinero. Contamos con profesionales en este ámbito que garantizan una recuperación rápida y legal.",
        link: "#seguridad-fisica",
    },
    Service {
        title: "CONSULTORÍA DE SEGURIDAD",
        description: "Analizamos riesgos y diseñamos estrategias personalizadas para reforzar la seguridad de personas, empresas y propiedades.",
        link: "#seguridad-fisica",
    },
    Service {
        title: "ACOMPAÑAMIENTO VIP",
        description: "Atención personalizada, discreción absoluta y asistencia exclusiva en cada momento que lo necesites.",
        link: "#seguridad-fisica",
    },
];

pub const TESTIMONIALS: [Testimonial; 6] = [
    Testimonial {
        name: "Emilio Romo",
        avatar: "ER",
        rating: 5,
        text: "Increíble! Muy eficaces y profesionales, solucionaron mi situación en tiempo record, muy recomendable sin duda!!!",
    },
    Testimonial {
        name: "Iván González",
        avatar: "IG",
        rating: 5,
        text: "Los mejores sin duda!!! Un servicio excepcional, rápido y muy profesional. Se nota la experiencia en cada paso.",
    },
    Testimonial {
        name: "Alejandro Gómez Martín",
        avatar: "AG",
        rating: 5,
        text: "Hicieron un servicio eficiente y profesional, solucionando una situación delicada de la manera más rápida posible.",
    },
    Testimonial {
        name: "Juanjino Je",
        avatar: "JJ",
        rating: 5,
        text: "No sabía que aun quedaba gente tan honrada buena y profesional todo a la vez. Se nota que saben muy bien lo que hacen.",
    },
    Testimonial {
        name: "Estefanía De Haro",
        avatar: "ED",
        rating: 5,
        text: "Un 10/10, desde el trato, la amabilidad, la fiabilidad y el compromiso. Son personas serias, puntuales y siempre profesionales.",
    },
    Testimonial {
        name: "Antonio Virgilioso",
        avatar: "AV",
        rating: 5,
        text: "Muy buena empresa de seguridad. Equipo de profesionales con una calidad humana que sorprende. Mi padre se sintió muy cómodo.",
    },
];

impl Testimonial {
    /// Rating as filled and empty stars, e.g. `★★★★★`.
    pub fn stars(&self) -> String {
        let filled = self.rating.min(5) as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}
