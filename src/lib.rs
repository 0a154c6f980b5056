//! SchoolHub - 学校学习管理平台后端服务
//!
//! 基于 Actix Web 构建：学校 / 年级 / 课程 / 班级的层级管理、按角色裁剪的学校视图、
//! 帖子信息流与作业评分。登录和附件共享交给第三方身份提供方。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），缓存已校验的会话
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证与学校成员校验中间件
//! - `models`: 数据模型、学校视图与帖子可见性规则
//! - `provider`: 身份提供方（OAuth 与文件共享）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod provider;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
