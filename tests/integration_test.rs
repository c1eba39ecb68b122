use auto_image_mapper::orchestrator::App;
use auto_image_mapper::services::{ApplyMode, CatalogService, LoadOutcome, NameParser};
use auto_image_mapper::workflow::{FlowResult, ImageCtx, ImageFlow};
use auto_image_mapper::{AppError, ApplyError, Config, ImageCategory, ParseError};
use serde_json::{json, Value};
use std::path::Path;

/// 构造一个指向临时目录的批次配置
fn batch_config(dir: &Path, json_path: &Path) -> Config {
    Config {
        json_file_path: json_path.to_string_lossy().to_string(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    }
}

/// 在临时目录中写入一个 JSON 目录文件，返回其路径
fn write_catalog(dir: &Path, records: Value) -> std::path::PathBuf {
    let path = dir.join("catalog.json");
    std::fs::write(&path, serde_json::to_string_pretty(&records).expect("序列化失败"))
        .expect("写入目录文件失败");
    path
}

/// 读取某道题某个分类的图片名列表
fn image_names(catalog: &CatalogService, question_id: i64, category: ImageCategory) -> Vec<String> {
    catalog
        .image_list(question_id, category)
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_parse_image_name() {
    let parser = NameParser::new();

    // 带 q 前缀 + 序号
    let d = parser.parse("q34_qu_1.png").expect("q34_qu_1.png 应该解析成功");
    assert_eq!(d.question_id, 34);
    assert_eq!(d.type_code, "qu");
    assert_eq!(d.category, ImageCategory::Question);
    assert_eq!(d.sequence, 1);
    assert_eq!(d.full_name, "q34_qu_1.png");

    // 无前缀 + 无序号，类型码带后缀
    let d = parser.parse("38_soD.png").expect("38_soD.png 应该解析成功");
    assert_eq!(d.question_id, 38);
    assert_eq!(d.type_code, "soD");
    assert_eq!(d.category, ImageCategory::Solution);
    assert_eq!(d.sequence, 0);

    // 大写 Q 前缀，op 类型码带后缀
    let d = parser.parse("Q12_op2_3.jpg").expect("Q12_op2_3.jpg 应该解析成功");
    assert_eq!(d.question_id, 12);
    assert_eq!(d.category, ImageCategory::Option);
    assert_eq!(d.sequence, 3);

    // 裸 so / op 与带后缀的分类一致
    let d = parser.parse("7_so.png").expect("7_so.png 应该解析成功");
    assert_eq!(d.category, ImageCategory::Solution);
    let d = parser.parse("7_op.png").expect("7_op.png 应该解析成功");
    assert_eq!(d.category, ImageCategory::Option);

    // 第三段不是纯数字时序号默认 0
    let d = parser.parse("5_qu_final.png").expect("5_qu_final.png 应该解析成功");
    assert_eq!(d.sequence, 0);

    // 第三段之后的内容一律忽略
    let d = parser.parse("5_qu_2_draft_old.png").expect("应该解析成功");
    assert_eq!(d.sequence, 2);
}

#[test]
fn test_parse_errors() {
    let parser = NameParser::new();

    // 不足两段
    assert!(matches!(
        parser.parse("lonely.png"),
        Err(AppError::Parse(ParseError::InvalidFormat { .. }))
    ));

    // ID 段不是数字
    assert!(matches!(
        parser.parse("abc_qu_1.png"),
        Err(AppError::Parse(ParseError::InvalidIdentifier { .. }))
    ));

    // 只有 q 前缀没有数字
    assert!(matches!(
        parser.parse("q_qu_1.png"),
        Err(AppError::Parse(ParseError::InvalidIdentifier { .. }))
    ));

    // 未知类型码
    assert!(matches!(
        parser.parse("12_xy_1.png"),
        Err(AppError::Parse(ParseError::UnknownTypeCode { .. }))
    ));

    // 单独的 s 不猜测为 so
    assert!(matches!(
        parser.parse("12_s_1.png"),
        Err(AppError::Parse(ParseError::UnknownTypeCode { .. }))
    ));
}

#[tokio::test]
async fn test_add_sorts_by_sequence() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(
        dir.path(),
        json!([{ "id": 34, "question_images": ["34_qu_2.png"] }]),
    );

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let parser = NameParser::new();
    let d = parser.parse("34_qu_1.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");

    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_1.png", "34_qu_2.png"]
    );
}

#[tokio::test]
async fn test_sort_invariant_after_each_add() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 9 }]));

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let parser = NameParser::new();

    // 乱序添加，每次套用后列表都必须按尾部序号非递减
    for name in ["9_qu_5.png", "9_qu_1.png", "9_qu_3.png", "9_qu_2.png", "9_qu_4.png"] {
        let d = parser.parse(name).expect("解析失败");
        catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");

        let names = image_names(&catalog, 9, ImageCategory::Question);
        let seqs: Vec<u32> = names
            .iter()
            .map(|n| parser.parse(n).expect("解析失败").sequence)
            .collect();
        let mut sorted = seqs.clone();
        sorted.sort();
        assert_eq!(seqs, sorted, "每次添加后列表都应按序号升序: {:?}", names);
    }
}

#[tokio::test]
async fn test_elements_without_sequence_sort_as_zero() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(
        dir.path(),
        json!([{ "id": 34, "question_images": ["34_qu_2.png"] }]),
    );

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    // 没有尾部序号的元素按 0 排序，应排到序号 2 之前
    let d = NameParser::new().parse("34_qu.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");

    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu.png", "34_qu_2.png"]
    );
}

#[tokio::test]
async fn test_duplicate_add_rejected() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 34 }]));

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let d = NameParser::new().parse("34_qu_1.png").expect("解析失败");

    // 第一次成功，第二次重复被整体拒绝
    catalog.apply(&d, ApplyMode::Add, false).expect("第一次添加应该成功");
    assert!(matches!(
        catalog.apply(&d, ApplyMode::Add, false),
        Err(AppError::Apply(ApplyError::DuplicateEntry { .. }))
    ));

    // 列表中只出现一次
    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_1.png"]
    );
}

#[tokio::test]
async fn test_remove_inverts_add() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(
        dir.path(),
        json!([{ "id": 34, "question_images": ["34_qu_1.png", "34_qu_3.png"] }]),
    );

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let before = image_names(&catalog, 34, ImageCategory::Question);

    let d = NameParser::new().parse("34_qu_2.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");
    catalog.apply(&d, ApplyMode::Remove, false).expect("移除失败");

    // 先加后删应恢复原状（相同元素、相同顺序）
    assert_eq!(image_names(&catalog, 34, ImageCategory::Question), before);
}

#[tokio::test]
async fn test_remove_absent_and_record_not_found() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 34 }]));

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let parser = NameParser::new();

    // 移除不存在的图片名
    let d = parser.parse("34_qu_1.png").expect("解析失败");
    assert!(matches!(
        catalog.apply(&d, ApplyMode::Remove, false),
        Err(AppError::Apply(ApplyError::EntryNotPresent { .. }))
    ));

    // 题目 ID 不存在时绝不自动创建记录
    let d = parser.parse("99_qu_1.png").expect("解析失败");
    assert!(matches!(
        catalog.apply(&d, ApplyMode::Add, false),
        Err(AppError::Apply(ApplyError::RecordNotFound { question_id: 99 }))
    ));
    assert_eq!(catalog.records().len(), 1);
}

#[tokio::test]
async fn test_dry_run_is_neutral() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(
        dir.path(),
        json!([{ "id": 34, "question_images": ["34_qu_2.png"] }]),
    );
    let before_on_disk = std::fs::read_to_string(&path).expect("读取失败");

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let parser = NameParser::new();

    // 试演添加：返回成功描述，但列表不变
    let d = parser.parse("34_qu_1.png").expect("解析失败");
    let summary = catalog.apply(&d, ApplyMode::Add, true).expect("试演添加应该成功");
    assert!(summary.contains("34_qu_1.png"));
    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_2.png"]
    );

    // 试演移除：同样不改动列表
    let d = parser.parse("34_qu_2.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Remove, true).expect("试演移除应该成功");
    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_2.png"]
    );

    // 试演批次不会调用 save，磁盘内容保持不变
    let after_on_disk = std::fs::read_to_string(&path).expect("读取失败");
    assert_eq!(before_on_disk, after_on_disk);
}

#[tokio::test]
async fn test_save_round_trip_preserves_unknown_fields() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(
        dir.path(),
        json!([{
            "id": 34,
            "title": "牛顿第二定律",
            "difficulty": 3,
            "question_images": ["34_qu_1.png"]
        }]),
    );

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    // 添加一张解析图片：solution_images 字段此前不存在，应自动创建
    let d = NameParser::new().parse("34_so_1.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");
    catalog.save().await.expect("保存失败");

    let content = std::fs::read_to_string(&path).expect("读取失败");
    let records: Vec<Value> = serde_json::from_str(&content).expect("保存结果应是合法 JSON");

    // 未知字段原样保留
    assert_eq!(records[0]["title"], json!("牛顿第二定律"));
    assert_eq!(records[0]["difficulty"], json!(3));
    assert_eq!(records[0]["question_images"], json!(["34_qu_1.png"]));
    assert_eq!(records[0]["solution_images"], json!(["34_so_1.png"]));

    // 字段顺序保留（title 在 difficulty 之前），缩进为 4 空格
    let title_pos = content.find("\"title\"").expect("应包含 title");
    let difficulty_pos = content.find("\"difficulty\"").expect("应包含 difficulty");
    assert!(title_pos < difficulty_pos, "字段顺序应与原文件一致");
    assert!(content.contains("    \"id\""), "应使用 4 空格缩进");
}

#[tokio::test]
async fn test_load_missing_and_decode_error() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");

    // 文件不存在：软性警告，空目录继续
    let mut catalog = CatalogService::new(dir.path().join("no_such.json"));
    let outcome = catalog.load().await.expect("文件缺失不应是错误");
    assert_eq!(outcome, LoadOutcome::FileMissing);
    assert!(catalog.records().is_empty());

    // JSON 不合法：批次必须中止，目录保持为空
    let bad_path = dir.path().join("bad.json");
    std::fs::write(&bad_path, "{ not valid json").expect("写入失败");
    let mut catalog = CatalogService::new(&bad_path);
    assert!(catalog.load().await.is_err());
    assert!(catalog.records().is_empty());
}

#[tokio::test]
async fn test_flow_skips_missing_file_in_add_mode() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let json_path = write_catalog(dir.path(), json!([{ "id": 34 }]));

    // 图片目录中只有 34_qu_1.png
    let image_folder = dir.path().join("images");
    std::fs::create_dir(&image_folder).expect("创建图片目录失败");
    std::fs::write(image_folder.join("34_qu_1.png"), b"png").expect("写入失败");

    let config = Config {
        json_file_path: json_path.to_string_lossy().to_string(),
        image_folder: image_folder.to_string_lossy().to_string(),
        output_log_file: dir.path().join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    };

    let flow = ImageFlow::new(&config);
    let mut catalog = CatalogService::new(&config.json_file_path);
    catalog.load().await.expect("加载目录失败");

    // 文件存在 → 正常添加
    let ctx = ImageCtx::new(1, 2, false, false);
    let result = flow
        .run(&mut catalog, "34_qu_1.png", &ctx)
        .await
        .expect("流程不应失败");
    assert_eq!(result, FlowResult::Applied);

    // 文件不存在 → 跳过，不会进入解析和套用
    let ctx = ImageCtx::new(2, 2, false, false);
    let result = flow
        .run(&mut catalog, "34_qu_2.png", &ctx)
        .await
        .expect("流程不应失败");
    assert_eq!(result, FlowResult::Skipped);
    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_1.png"]
    );

    // 移除模式不做存在性校验：34_qu_1.png 可以直接移除
    let ctx = ImageCtx::new(1, 1, false, true);
    let result = flow
        .run(&mut catalog, "34_qu_1.png", &ctx)
        .await
        .expect("流程不应失败");
    assert_eq!(result, FlowResult::Applied);
    assert!(image_names(&catalog, 34, ImageCategory::Question).is_empty());

    // 报告文件应记录三条结果
    let report = std::fs::read_to_string(&config.output_log_file).expect("读取报告失败");
    assert!(report.contains("OK: 已将 34_qu_1.png 添加到题目 ID 34"));
    assert!(report.contains("SKIP: 34_qu_2.png 文件不存在"));
    assert!(report.contains("OK: 已从题目 ID 34"));
}

#[tokio::test]
async fn test_batch_dry_run_never_touches_backing_store() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 34 }]));
    let before_on_disk = std::fs::read_to_string(&path).expect("读取失败");

    let config = Config {
        dry_run: true,
        ..batch_config(dir.path(), &path)
    };

    // 试演批次：即使有成功的套用，也绝不调用 save
    let mut app = App::initialize(config).await.expect("初始化失败");
    let stats = app
        .run(vec!["34_qu_1.png".to_string()])
        .await
        .expect("批次不应失败");

    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 0);

    let after_on_disk = std::fs::read_to_string(&path).expect("读取失败");
    assert_eq!(before_on_disk, after_on_disk, "试演批次必须保持磁盘内容不变");
}

#[tokio::test]
async fn test_batch_mixed_results_saves_with_correct_stats() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 34 }]));

    let config = batch_config(dir.path(), &path);

    // 混合批次：1 个成功 + 2 个失败（记录不存在、格式不合法），单个失败不中止
    let mut app = App::initialize(config).await.expect("初始化失败");
    let stats = app
        .run(vec![
            "34_qu_1.png".to_string(),
            "99_qu_1.png".to_string(),
            "lonely.png".to_string(),
        ])
        .await
        .expect("批次不应失败");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 2);

    // 有改动且非试演 → 批次末尾写回一次
    let content = std::fs::read_to_string(&path).expect("读取失败");
    let records: Vec<Value> = serde_json::from_str(&content).expect("保存结果应是合法 JSON");
    assert_eq!(records[0]["question_images"], json!(["34_qu_1.png"]));
}

#[tokio::test]
async fn test_batch_all_failures_does_not_rewrite_file() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = write_catalog(dir.path(), json!([{ "id": 34 }]));
    let before_on_disk = std::fs::read_to_string(&path).expect("读取失败");

    let config = batch_config(dir.path(), &path);

    // 全部失败的批次：成功数为 0，不应触发 save
    let mut app = App::initialize(config).await.expect("初始化失败");
    let stats = app
        .run(vec!["99_qu_1.png".to_string(), "12_xy_1.png".to_string()])
        .await
        .expect("批次不应失败");

    assert_eq!(stats.success, 0);
    assert_eq!(stats.failed, 2);

    let after_on_disk = std::fs::read_to_string(&path).expect("读取失败");
    assert_eq!(before_on_disk, after_on_disk, "没有成功的改动就不应重写文件");
}

#[tokio::test]
async fn test_batch_aborts_on_decode_error() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let bad_path = dir.path().join("bad.json");
    std::fs::write(&bad_path, "{ not valid json").expect("写入失败");

    let config = batch_config(dir.path(), &bad_path);

    // 目录内容不可信时整个批次中止
    let mut app = App::initialize(config).await.expect("初始化失败");
    let result = app.run(vec!["34_qu_1.png".to_string()]).await;
    assert!(result.is_err(), "JSON 解析失败必须中止批次");
}

#[tokio::test]
async fn test_first_matching_record_wins() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");

    // id 重复时首个匹配的记录生效
    let path = write_catalog(
        dir.path(),
        json!([
            { "id": 34, "question_images": [] },
            { "id": 34, "question_images": ["dup_34_qu_9.png"] }
        ]),
    );

    let mut catalog = CatalogService::new(&path);
    catalog.load().await.expect("加载目录失败");

    let d = NameParser::new().parse("34_qu_1.png").expect("解析失败");
    catalog.apply(&d, ApplyMode::Add, false).expect("添加失败");

    assert_eq!(
        image_names(&catalog, 34, ImageCategory::Question),
        vec!["34_qu_1.png"]
    );
}
