use super::{
    fsm::{EstimateEvent, EstimateStateMachine},
    prompt::{VehicleHint, compose_prompt},
    upload::{TransientFile, Upload},
};
use crate::{
    Result,
    config::{Config, UploadConfig},
    vision::{ChatCompletionRequest, VisionClient},
};
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info};
use uuid::Uuid;

/// Runs one upload through encode, prompt, invoke and extract, removing the
/// transient copy on every exit path.
pub struct DamageEstimator {
    client: Arc<dyn VisionClient>,
    model: String,
    temp_dir: PathBuf,
    max_image_bytes: Option<usize>,
}

impl DamageEstimator {
    pub fn new(
        client: Arc<dyn VisionClient>,
        model: impl Into<String>,
        upload: &UploadConfig,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            temp_dir: upload.resolved_temp_dir(),
            max_image_bytes: upload.max_image_bytes,
        }
    }

    pub fn from_config(client: Arc<dyn VisionClient>, config: &Config) -> Self {
        Self::new(client, config.vision.model.clone(), &config.upload)
    }

    pub fn max_image_bytes(&self) -> Option<usize> {
        self.max_image_bytes
    }

    pub async fn estimate(&self, upload: Upload, hint: &VehicleHint) -> Result<String> {
        let mut machine = EstimateStateMachine::new(Uuid::new_v4());
        info!(
            "Estimating damage for request {} ({} bytes, {:?}, {:?})",
            machine.request_id(),
            upload.bytes.len(),
            upload.file_name,
            upload.content_type
        );

        let result = self.run(&mut machine, &upload, hint).await;

        if let Err(e) = &result {
            error!("Estimate {} failed: {}", machine.request_id(), e);
            if !machine.is_terminal() {
                machine.transition(EstimateEvent::ErrorOccurred)?;
            }
        }

        result
    }

    async fn run(
        &self,
        machine: &mut EstimateStateMachine,
        upload: &Upload,
        hint: &VehicleHint,
    ) -> Result<String> {
        upload.validate(self.max_image_bytes)?;

        let transient = TransientFile::create(&self.temp_dir, machine.request_id(), upload)?;
        let result = self.invoke(machine, &transient, hint).await;
        transient.release().await;

        result
    }

    async fn invoke(
        &self,
        machine: &mut EstimateStateMachine,
        transient: &TransientFile,
        hint: &VehicleHint,
    ) -> Result<String> {
        let image_b64 = transient.read_base64().await?;
        machine.transition(EstimateEvent::ImageEncoded)?;

        let prompt = compose_prompt(hint, &image_b64);
        let request = ChatCompletionRequest::user_prompt(&self.model, prompt);

        let response = self.client.create_chat_completion(request).await?;
        machine.transition(EstimateEvent::ModelResponded)?;

        let content = response.into_content()?;
        machine.transition(EstimateEvent::ResultExtracted)?;

        Ok(content)
    }
}
