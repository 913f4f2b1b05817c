use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::info;

use super::loader::{load_all, load_file, resolve_path};
use super::{Artifact, PromptTemplate, Skill, SkillSummary, TemplateSummary};
use crate::error::{RegistryError, Result};

/// 1つのディレクトリに対する読み取り窓口
///
/// 状態を持たず、呼び出しのたびにディスクから読み直す。
#[derive(Debug, Clone)]
pub struct Catalog<A> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Artifact> Catalog<A> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _marker: PhantomData,
        }
    }

    /// 対象ディレクトリ
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 全件読み込み
    pub async fn load_all(&self) -> Result<Vec<A>> {
        load_all(&self.dir).await
    }

    /// 現在の名前一覧
    pub async fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all()
            .await?
            .iter()
            .map(|a| a.name().to_string())
            .collect())
    }

    /// 名前で取得。見つからなければ利用可能な名前を添えて `NotFound`
    pub async fn get(&self, name: &str) -> Result<A> {
        match resolve_path(&self.dir, name) {
            Some(path) => load_file(&path).await,
            None => Err(RegistryError::NotFound {
                kind: A::KIND,
                name: name.to_string(),
                available: self.names().await?,
            }),
        }
    }

    /// 再読み込みの結果メッセージ
    fn reload_message(&self, count: usize) -> String {
        format!(
            "Reloaded {} {} from {}",
            count,
            A::KIND.plural(),
            self.dir.display()
        )
    }
}

/// `list_templates` の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<TemplateSummary>,
    pub count: usize,
}

/// `reload_templates` の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateReload {
    pub message: String,
    pub templates: Vec<TemplateSummary>,
    pub count: usize,
}

/// `render_template` の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub name: String,
    /// 置換後の本文
    pub rendered: String,
    /// 値が渡されなかった変数
    pub unresolved: Vec<String>,
}

/// `list_skills` の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillList {
    pub skills: Vec<SkillSummary>,
    pub count: usize,
}

/// `reload_skills` の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillReload {
    pub message: String,
    pub skills: Vec<SkillSummary>,
    pub count: usize,
}

/// テンプレートとスキルのレジストリ
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    templates: Catalog<PromptTemplate>,
    skills: Catalog<Skill>,
}

impl PromptRegistry {
    pub fn new(templates_dir: impl Into<PathBuf>, skills_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: Catalog::new(templates_dir),
            skills: Catalog::new(skills_dir),
        }
    }

    pub fn templates(&self) -> &Catalog<PromptTemplate> {
        &self.templates
    }

    pub fn skills(&self) -> &Catalog<Skill> {
        &self.skills
    }

    /// テンプレート一覧（本文なし）
    pub async fn list_templates(&self) -> Result<TemplateList> {
        let templates: Vec<_> = self
            .templates
            .load_all()
            .await?
            .iter()
            .map(PromptTemplate::summary)
            .collect();
        Ok(TemplateList {
            count: templates.len(),
            templates,
        })
    }

    /// テンプレートを本文込みで取得
    pub async fn get_template(&self, name: &str) -> Result<PromptTemplate> {
        self.templates.get(name).await
    }

    /// テンプレートをレンダリング
    pub async fn render_template(
        &self,
        name: &str,
        values: &HashMap<String, String>,
    ) -> Result<RenderOutput> {
        let template = self.templates.get(name).await?;
        Ok(RenderOutput {
            name: name.to_string(),
            rendered: template.render(values),
            unresolved: template.unresolved(values),
        })
    }

    /// ディスクから読み直して一覧を返す
    pub async fn reload_templates(&self) -> Result<TemplateReload> {
        let list = self.list_templates().await?;
        let message = self.templates.reload_message(list.count);
        info!("{}", message);
        Ok(TemplateReload {
            message,
            templates: list.templates,
            count: list.count,
        })
    }

    /// スキル一覧（本文なし）
    pub async fn list_skills(&self) -> Result<SkillList> {
        let skills: Vec<_> = self
            .skills
            .load_all()
            .await?
            .iter()
            .map(Skill::summary)
            .collect();
        Ok(SkillList {
            count: skills.len(),
            skills,
        })
    }

    /// スキルを本文込みで取得
    pub async fn get_skill(&self, name: &str) -> Result<Skill> {
        self.skills.get(name).await
    }

    /// ディスクから読み直して一覧を返す
    pub async fn reload_skills(&self) -> Result<SkillReload> {
        let list = self.list_skills().await?;
        let message = self.skills.reload_message(list.count);
        info!("{}", message);
        Ok(SkillReload {
            message,
            skills: list.skills,
            count: list.count,
        })
    }
}
