use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Photo Restorer</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #3a6186 0%, #89253e 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            max-width: 1000px;
            width: 100%;
            padding: 40px;
        }

        h1 {
            color: #333;
            margin-bottom: 8px;
            font-size: 2em;
        }

        .subtitle {
            color: #666;
            margin-bottom: 30px;
        }

        .controls {
            display: flex;
            gap: 12px;
            flex-wrap: wrap;
            margin-bottom: 30px;
        }

        .button {
            border: none;
            border-radius: 10px;
            padding: 12px 24px;
            font-size: 1em;
            cursor: pointer;
            background: #3a6186;
            color: white;
        }

        .button:disabled {
            background: #bbb;
            cursor: not-allowed;
        }

        .panels {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
        }

        .panel {
            border: 2px dashed #ccc;
            border-radius: 15px;
            min-height: 320px;
            display: flex;
            align-items: center;
            justify-content: center;
            overflow: hidden;
            position: relative;
        }

        .panel img {
            max-width: 100%;
            max-height: 480px;
        }

        .placeholder {
            color: #999;
        }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #3a6186;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            animation: spin 1s linear infinite;
            margin: 0 auto 12px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .loader {
            text-align: center;
            color: #666;
        }

        [hidden] {
            display: none !important;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Photo Restorer</h1>
        <p class="subtitle">Upload an old photo to enhance, repair and colorize it.</p>

        <div class="controls">
            <input type="file" id="fileInput" accept="image/*">
            <button class="button" id="enhanceButton" disabled>Enhance</button>
            <button class="button" id="downloadButton" disabled>Download</button>
        </div>

        <div class="panels">
            <div class="panel">
                <img id="originalImage" alt="Original" hidden>
                <span class="placeholder" id="originalPlaceholder">Your photo will appear here</span>
            </div>
            <div class="panel">
                <img id="enhancedImage" alt="Enhanced" hidden>
                <span class="placeholder" id="enhancedPlaceholder">The restored photo will appear here</span>
                <div class="loader" id="loader" hidden>
                    <div class="spinner"></div>
                    <p>Restoring your photo...</p>
                </div>
            </div>
        </div>
    </div>

    <script>
        const regions = {
            original_image: document.getElementById('originalImage'),
            original_placeholder: document.getElementById('originalPlaceholder'),
            enhanced_image: document.getElementById('enhancedImage'),
            enhanced_placeholder: document.getElementById('enhancedPlaceholder'),
            loader: document.getElementById('loader'),
        };
        const controls = {
            file_input: document.getElementById('fileInput'),
            enhance: document.getElementById('enhanceButton'),
            download: document.getElementById('downloadButton'),
        };

        function render(view) {
            for (const [name, visible] of Object.entries(view.visible)) {
                regions[name].hidden = !visible;
            }
            for (const [name, enabled] of Object.entries(view.enabled)) {
                controls[name].disabled = !enabled;
            }
            setImage(regions.original_image, view.original);
            setImage(regions.enhanced_image, view.enhanced);
            for (const message of view.alerts) {
                alert(message);
            }
        }

        function setImage(element, image) {
            if (image) {
                if (element.getAttribute('src') !== image.src) {
                    element.src = image.src;
                }
            } else {
                element.removeAttribute('src');
            }
        }

        async function send(method, path, body) {
            const response = await fetch(path, { method, body });
            if (!response.ok) {
                throw new Error(`${method} ${path} failed with ${response.status}`);
            }
            return response.json();
        }

        async function refresh() {
            const view = await send('GET', '/api/view');
            render(view);
            if (view.phase === 'loading') {
                setTimeout(refresh, 500);
            }
        }

        controls.file_input.addEventListener('change', async (e) => {
            const file = e.target.files[0];
            if (!file) {
                return;
            }
            const formData = new FormData();
            formData.append('image', file);
            try {
                render(await send('POST', '/api/source', formData));
            } catch (error) {
                console.error(error);
                alert('Could not load the selected photo.');
            }
        });

        controls.enhance.addEventListener('click', async () => {
            try {
                const view = await send('POST', '/api/enhance');
                render(view);
                if (view.phase === 'loading') {
                    setTimeout(refresh, 500);
                }
            } catch (error) {
                console.error(error);
            }
        });

        controls.download.addEventListener('click', () => {
            window.location.href = '/api/download';
        });

        refresh().catch(console.error);
    </script>
</body>
</html>
"#;
