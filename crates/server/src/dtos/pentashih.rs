use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewPentashih {
    #[serde(alias = "id_pentashih")]
    pub pentashih_id: i32,
    #[serde(default)]
    pub santri_ids: Vec<i32>,
}

/// Replacement mentee list, sent either bare or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MenteeIds {
    List(Vec<i32>),
    Wrapped { santri_ids: Vec<i32> },
}

impl MenteeIds {
    pub fn into_vec(self) -> Vec<i32> {
        match self {
            Self::List(ids) | Self::Wrapped { santri_ids: ids } => ids,
        }
    }
}
