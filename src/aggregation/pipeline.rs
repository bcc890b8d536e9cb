use bson::{Bson, Document, doc};

/// Pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Document),
    AddFields(Document),
    Group {
        id: Bson,
        accumulators: Document,
    },
    Sort(Document),
}

impl Stage {
    /// Operator name as it appears in the stage document.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::AddFields(_) => "$addFields",
            Stage::Group { .. } => "$group",
            Stage::Sort(_) => "$sort",
        }
    }

    /// Render the stage document sent to the server.
    pub fn to_document(&self) -> Document {
        let body = match self {
            Stage::Match(filter) => filter.clone(),
            Stage::AddFields(fields) => fields.clone(),
            Stage::Group { id, accumulators } => {
                // _id always leads the group spec
                let mut spec = doc! {"_id": id.clone()};
                for (field, acc) in accumulators {
                    spec.insert(field.clone(), acc.clone());
                }
                spec
            }
            Stage::Sort(keys) => keys.clone(),
        };
        let mut out = Document::new();
        out.insert(self.name(), body);
        out
    }
}

/// Ordered list of stages for a single `aggregate` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }

    /// Relaxed extended JSON, for printing pipelines without running them.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.to_documents()
                .into_iter()
                .map(|d| Bson::Document(d).into_relaxed_extjson())
                .collect(),
        )
    }
}

impl From<Pipeline> for Vec<Document> {
    fn from(p: Pipeline) -> Self {
        p.to_documents()
    }
}
