use crate::adapters::decklist::{parse_collection_csv, parse_decklist};
use crate::adapters::topoff::parse_topoff;
use crate::core::card_list::CardList;
use crate::domain::model::{DeckList, DeckListType, PlanInput, PlanWarning};
use crate::domain::ports::Storage;
use crate::utils::error::{DiffError, Result};
use std::path::Path;

/// Reads the decklist directory: one sub-directory per [`DeckListType`],
/// one file per deck, deck name taken from the file stem.
pub struct DecklistStore<'a, S: Storage> {
    storage: &'a S,
    root: String,
    expected_deck_size: u32,
}

impl<'a, S: Storage> DecklistStore<'a, S> {
    pub fn new(storage: &'a S, root: impl Into<String>, expected_deck_size: u32) -> Self {
        Self {
            storage,
            root: root.into(),
            expected_deck_size,
        }
    }

    /// 依類型及檔名順序載入所有牌表
    pub async fn load_decks(&self) -> Result<(Vec<DeckList>, Vec<PlanWarning>)> {
        let mut decks = Vec::new();
        let mut warnings = Vec::new();

        for deck_type in DeckListType::ALL {
            let dir = join(&self.root, deck_type.dir_name());
            let files = self.storage.list_files(&dir).await?;
            tracing::debug!("📂 {}: {} files", dir, files.len());

            for file in files {
                let Some((name, extension)) = split_file_name(&file) else {
                    tracing::debug!("skipping {} in {}", file, dir);
                    continue;
                };

                let path = join(&dir, &file);
                let data = self.storage.read_file(&path).await?;
                let cards = match extension.as_str() {
                    "txt" => parse_decklist(&path, &decode(&path, &data)?)?,
                    "csv" => parse_collection_csv(&path, &data)?,
                    _ => {
                        tracing::debug!("skipping {} (unsupported extension)", path);
                        continue;
                    }
                };

                let deck = DeckList {
                    name: name.to_string(),
                    deck_type,
                    cards,
                };
                tracing::info!(
                    "📥 Loaded {} '{}' ({} cards)",
                    deck_type,
                    deck.name,
                    deck.card_list().total()
                );

                if let Some(warning) = self.check_deck_size(&deck) {
                    tracing::warn!("⚠️ {}", warning);
                    warnings.push(warning);
                }
                decks.push(deck);
            }
        }

        Ok((decks, warnings))
    }

    /// Missing or empty topoff files load as an empty list.
    pub async fn load_topoff(&self, file_name: &str) -> Result<CardList> {
        let path = join(&self.root, file_name);
        let data = match self.storage.read_file(&path).await {
            Ok(data) => data,
            Err(DiffError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("topoff file not found at {}, skipping top off order", path);
                return Ok(CardList::new());
            }
            Err(e) => return Err(e),
        };

        let topoff = parse_topoff(&decode(&path, &data)?);
        if topoff.is_empty() {
            tracing::info!("topoff file empty, skipping top off order");
        }
        Ok(topoff)
    }

    pub async fn load_input(&self, topoff_file: &str) -> Result<PlanInput> {
        let (decks, warnings) = self.load_decks().await?;
        let topoff = self.load_topoff(topoff_file).await?;

        // 全部輸入的總張數必須在 u32 範圍內
        decks
            .iter()
            .try_fold(topoff.total(), |sum, deck| {
                sum.checked_add(deck.card_list().total())
            })
            .ok_or_else(|| DiffError::ValidationError {
                message: "decklists hold more cards than can be counted".to_string(),
            })?;

        Ok(PlanInput {
            decks,
            topoff,
            warnings,
        })
    }

    fn check_deck_size(&self, deck: &DeckList) -> Option<PlanWarning> {
        if self.expected_deck_size == 0 || deck.deck_type == DeckListType::Collection {
            return None;
        }
        let count = deck.deck_size();
        (count != self.expected_deck_size).then(|| PlanWarning::DeckSize {
            deck: deck.name.clone(),
            count,
            expected: self.expected_deck_size,
        })
    }
}

pub(crate) fn join(base: &str, path: &str) -> String {
    Path::new(base).join(path).to_string_lossy().into_owned()
}

fn split_file_name(file: &str) -> Option<(&str, String)> {
    let path = Path::new(file);
    let stem = path.file_stem()?.to_str()?;
    let extension = path.extension()?.to_str()?.to_lowercase();
    Some((stem, extension))
}

fn decode(path: &str, data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|_| DiffError::ParseError {
        file: path.to_string(),
        line: 0,
        message: "file is not valid UTF-8".to_string(),
    })
}
