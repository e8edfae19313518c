//! Prompt text sent to the vision model.
//!
//! Result quality depends on the model seeing this exact structure: optional
//! vehicle sentences, the fixed instruction, the six-field response template,
//! then the inline image.

const INSTRUCTION: &str = "Analyze this car image and provide details on visible damage, \
repair costs, and car price.ALWAYS REVERIFY IF THE DAMAGES ARE REAL AS THIS IS VERY IMPORTANT ";

const RESPONSE_FORMAT: &str = "Response format:\n\
Car Name: (e.g., Toyota Corolla)\n\
Model: (e.g., 2022)\n\
Car Price: (Estimated base price of the car)\n\
Damage Description: (e.g., scratches, dents)\n\
Damage Estimation: (Repair cost in USD)\n\
Total Estimated Price: (Car Price - Repair Cost)";

/// Optional caller-supplied vehicle details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleHint {
    name: Option<String>,
    model_year: Option<String>,
}

impl VehicleHint {
    /// Blank values are treated as absent.
    pub fn new(name: Option<String>, model_year: Option<String>) -> Self {
        Self {
            name: non_blank(name),
            model_year: non_blank(model_year),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn model_year(&self) -> Option<&str> {
        self.model_year.as_deref()
    }

    fn context(&self) -> String {
        let mut context = String::new();
        if let Some(name) = &self.name {
            context.push_str(&format!("The car is a {}. ", name));
        }
        if let Some(year) = &self.model_year {
            context.push_str(&format!("The model year is {}. ", year));
        }
        context
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn compose_prompt(hint: &VehicleHint, image_b64: &str) -> String {
    format!(
        "{}{}{}\n\n<img src=\"data:image/png;base64,{}\" />",
        hint.context(),
        INSTRUCTION,
        RESPONSE_FORMAT,
        image_b64
    )
}
