use {
    serde::Serialize,
    tracing::{info, debug},
    pilkada_sentiment_core::{
        entity::SentimentLabel,
        error::{Error, Result},
    },
    crate::{
        model::{Classifier, FeatureEncoder, FeatureSelector, FeatureMask, LinearClassifier, ModelArtifacts, TfidfEncoder},
        normalizer::NormalizedText,
    },
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Confidence {
    pub label: SentimentLabel,
    /// 0..=100
    pub percentage: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    label: SentimentLabel,
    confidence: Vec<Confidence>,
}

pub struct SentimentClassifier<E, F, C> {
    encoder: E,
    selector: F,
    classifier: C,
}

pub type FittedSentimentClassifier = SentimentClassifier<TfidfEncoder, FeatureMask, LinearClassifier>;

impl PredictionResult {
    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    /// Sorted by percentage, highest first.
    pub fn confidence(&self) -> &[Confidence] {
        &self.confidence
    }
}

impl<E: FeatureEncoder, F: FeatureSelector, C: Classifier> SentimentClassifier<E, F, C> {
    pub fn new(encoder: E, selector: F, classifier: C) -> Self {
        Self {
            encoder,
            selector,
            classifier,
        }
    }

    /// Only normalized, non-empty text is accepted; [`crate::normalizer::Normalized::Empty`] must be handled by the caller.
    pub fn predict(&self, text: &NormalizedText) -> Result<PredictionResult> {
        let features = self.encoder.transform(text.as_str())?;
        let selected = self.selector.transform(&features)?;

        let class_id = self.classifier.predict(&selected)?;
        let label = label_for_class(class_id)?;

        let mut confidence = match self.classifier.predict_probabilities(&selected)? {
            Some(probabilities) => {
                let classes = self.classifier.classes();
                if probabilities.len() != classes.len() {
                    return Err(Error::model(format!(
                        "classifier reported {} probabilities for {} classes",
                        probabilities.len(),
                        classes.len(),
                    )));
                }

                classes.iter()
                    .zip(probabilities)
                    .map(|(class_id, probability)| -> Result<Confidence> {
                        Ok(Confidence {
                            label: label_for_class(*class_id)?,
                            percentage: probability * 100.0,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            },
            None => {
                debug!("classifier has no probability output, reporting full confidence for {}", label);
                vec![Confidence {
                    label,
                    percentage: 100.0,
                }]
            },
        };

        // stable, so ties keep the classifier's class order
        confidence.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        info!("predicted sentiment: {}", label);

        Ok(PredictionResult {
            label,
            confidence,
        })
    }
}

impl FittedSentimentClassifier {
    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self::new(artifacts.encoder, artifacts.selector, artifacts.classifier)
    }
}

fn label_for_class(class_id: u32) -> Result<SentimentLabel> {
    SentimentLabel::from_class_id(class_id)
        .ok_or_else(|| Error::model(format!("classifier returned unknown class id {}", class_id)))
}
